use crate::{APIResponse, BaseClient};
use aurora_fest_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

/// Endpoints called by the external scheduler
#[derive(Clone)]
pub struct TaskClient {
    base: Arc<BaseClient>,
}

impl TaskClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn sweep_reminders(&self, force: bool) -> APIResponse<sweep_reminders::APIResponse> {
        let path = if force {
            "tasks/reminders?force=1"
        } else {
            "tasks/reminders"
        };
        self.base.get(path.into(), StatusCode::OK).await
    }
}
