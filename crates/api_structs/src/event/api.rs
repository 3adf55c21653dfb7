use crate::dtos::FestivalEventDTO;
use aurora_fest_domain::{FestivalEvent, ID};
use serde::{Deserialize, Serialize};

pub mod update_event_schedule {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub start_ts: i64,
        #[serde(default)]
        pub end_ts: Option<i64>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct APIResponse {
        pub event: FestivalEventDTO,
    }

    impl APIResponse {
        pub fn new(event: FestivalEvent) -> Self {
            Self {
                event: FestivalEventDTO::new(event),
            }
        }
    }
}
