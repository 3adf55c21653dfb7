use crate::{APIResponse, BaseClient, ID};
use aurora_fest_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub type VerifyReminderLinkInput = verify_reminder_link::QueryParams;

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, event_id: ID) -> APIResponse<create_reminders::APIResponse> {
        let body = create_reminders::RequestBody { event_id };
        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    /// Without an event the ids of every event with an active reminder are returned
    pub async fn get_state(
        &self,
        event_id: Option<ID>,
    ) -> APIResponse<get_reminder_state::APIResponse> {
        let path = match event_id {
            Some(event_id) => format!("reminders?eventId={}", event_id),
            None => "reminders".to_string(),
        };
        self.base.get(path, StatusCode::OK).await
    }

    pub async fn cancel(&self, event_id: ID) -> APIResponse<cancel_reminders::APIResponse> {
        self.base
            .delete(format!("reminders/{}", event_id), StatusCode::OK)
            .await
    }

    pub async fn verify_link(
        &self,
        input: VerifyReminderLinkInput,
    ) -> APIResponse<verify_reminder_link::APIResponse> {
        self.base
            .get(
                format!(
                    "reminders/links/verify?e={}&r={}&d={}&u={}&sig={}",
                    input.e, input.r, input.d, input.u, input.sig
                ),
                StatusCode::OK,
            )
            .await
    }
}
