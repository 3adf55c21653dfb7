use aurora_fest_domain::{FestivalEvent, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FestivalEventDTO {
    pub id: ID,
    pub title: String,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
}

impl FestivalEventDTO {
    pub fn new(event: FestivalEvent) -> Self {
        Self {
            id: event.id,
            title: event.title,
            start_ts: event.start_ts,
            end_ts: event.end_ts,
        }
    }
}
