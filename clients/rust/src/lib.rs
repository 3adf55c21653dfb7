mod base;
mod event;
mod push;
mod reminder;
mod status;
mod task;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use event::EventClient;
pub use event::UpdateEventScheduleInput;
use push::PushClient;
pub use push::AuthorizePushChannelInput;
use reminder::ReminderClient;
pub use reminder::VerifyReminderLinkInput;
use status::StatusClient;
use std::sync::Arc;
use task::TaskClient;

pub use aurora_fest_api_structs::dtos::*;
pub use aurora_fest_api_structs::get_reminder_state::APIResponse as ReminderState;
pub use aurora_fest_domain::ID;

// Domain
pub use aurora_fest_api_structs::dtos::FestivalEventDTO as FestivalEvent;
pub use aurora_fest_api_structs::dtos::ReminderDTO as Reminder;

/// Aurora Fest SDK
///
/// The SDK contains methods for interacting with the Aurora Fest reminder
/// service API.
#[derive(Clone)]
pub struct FestSDK {
    pub event: EventClient,
    pub push: PushClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub task: TaskClient,
}

impl FestSDK {
    /// Client acting on behalf of the holder of the session token. An empty
    /// token makes anonymous requests.
    pub fn new<T: Into<String>>(address: String, session_token: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_session_token(session_token.into());
        Self::from_base(base)
    }

    /// Client for the external scheduler, authenticated with the cron secret
    pub fn with_cron_secret<T: Into<String>>(address: String, cron_secret: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_cron_secret(cron_secret.into());
        Self::from_base(base)
    }

    fn from_base(base: BaseClient) -> Self {
        let base = Arc::new(base);
        let event = EventClient::new(base.clone());
        let push = PushClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let task = TaskClient::new(base);

        Self {
            event,
            push,
            reminder,
            status,
            task,
        }
    }
}
