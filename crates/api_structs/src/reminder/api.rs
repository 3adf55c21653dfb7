use crate::dtos::{CreatedReminderDTO, FestivalEventDTO, ReminderDTO, SweepWindowDTO};
use aurora_fest_domain::{FestivalEvent, InvalidIDError, Reminder, ID};
use serde::{Deserialize, Serialize};

pub mod create_reminders {
    use super::*;

    #[derive(Serialize, Deserialize)]
    pub struct RequestBody {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct APIResponse {
        pub ok: bool,
        pub created: Vec<CreatedReminderDTO>,
        #[serde(rename = "emailSent")]
        pub email_sent: bool,
    }

    impl APIResponse {
        pub fn new(created: &[Reminder], email_sent: bool) -> Self {
            Self {
                ok: true,
                created: created.iter().map(CreatedReminderDTO::new).collect(),
                email_sent,
            }
        }
    }
}

pub mod get_reminder_state {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, Default)]
    pub struct QueryParams {
        #[serde(rename = "eventId", default)]
        pub event_id: Option<String>,
    }

    impl QueryParams {
        /// An empty `eventId` asks for every active event
        pub fn event_id(&self) -> Result<Option<ID>, InvalidIDError> {
            match self.event_id.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(event_id) => event_id.parse().map(Some),
            }
        }
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(untagged)]
    pub enum APIResponse {
        ActiveEvents {
            #[serde(rename = "activeEventIds")]
            active_event_ids: Vec<ID>,
        },
        Event {
            active: bool,
        },
    }
}

pub mod cancel_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct APIResponse {
        pub ok: bool,
        #[serde(rename = "disabledCount")]
        pub disabled_count: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub note: Option<String>,
    }
}

pub mod sweep_reminders {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, Default)]
    pub struct QueryParams {
        #[serde(default)]
        pub force: Option<String>,
    }

    impl QueryParams {
        /// `?force` and `?force=1` force the sweep, `?force=0` and `?force=false` do not
        pub fn is_forced(&self) -> bool {
            match self.force.as_deref().map(str::trim) {
                None => false,
                Some(value) => !matches!(value, "0" | "false"),
            }
        }
    }

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub ok: bool,
        pub processed: u64,
        pub emails_sent: u64,
        pub pusher_sent: u64,
        pub window: SweepWindowDTO,
    }
}

pub mod verify_reminder_link {
    use super::*;

    /// Query of the links sent in reminder emails, `e` being the event
    #[derive(Serialize, Deserialize, Debug)]
    pub struct QueryParams {
        pub e: ID,
        pub r: ID,
        pub d: i64,
        pub u: ID,
        pub sig: String,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct APIResponse {
        pub valid: bool,
        pub reminder: ReminderDTO,
        pub event: FestivalEventDTO,
    }

    impl APIResponse {
        pub fn new(reminder: Reminder, event: FestivalEvent) -> Self {
            Self {
                valid: true,
                reminder: ReminderDTO::new(reminder),
                event: FestivalEventDTO::new(event),
            }
        }
    }
}
