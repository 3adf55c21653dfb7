use crate::{APIResponse, BaseClient, ID};
use aurora_fest_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct EventClient {
    base: Arc<BaseClient>,
}

pub struct UpdateEventScheduleInput {
    pub event_id: ID,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
}

impl EventClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Moves an event, the reminders of every attendee follow it
    pub async fn update_schedule(
        &self,
        input: UpdateEventScheduleInput,
    ) -> APIResponse<update_event_schedule::APIResponse> {
        let body = update_event_schedule::RequestBody {
            start_ts: input.start_ts,
            end_ts: input.end_ts,
        };
        self.base
            .put(
                body,
                format!("admin/events/{}/schedule", input.event_id),
                StatusCode::OK,
            )
            .await
    }
}
