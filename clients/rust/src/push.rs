use crate::{APIResponse, BaseClient};
use aurora_fest_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct PushClient {
    base: Arc<BaseClient>,
}

pub struct AuthorizePushChannelInput {
    pub socket_id: String,
    pub channel_name: String,
}

impl PushClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn authorize_channel(
        &self,
        input: AuthorizePushChannelInput,
    ) -> APIResponse<authorize_push_channel::APIResponse> {
        let form = authorize_push_channel::RequestBody {
            socket_id: input.socket_id,
            channel_name: input.channel_name,
        };
        self.base
            .post_form(form, "pusher/auth".into(), StatusCode::OK)
            .await
    }
}
