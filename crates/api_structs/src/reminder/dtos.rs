use aurora_fest_domain::{format_rfc3339, Reminder, SweepWindow, ID};
use serde::{Deserialize, Serialize};

/// A reminder created or reactivated by an activation
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreatedReminderDTO {
    pub id: ID,
    pub delai: i64,
}

impl CreatedReminderDTO {
    pub fn new(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id,
            delai: reminder.delay.minutes(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub event_id: ID,
    pub user_id: ID,
    pub delai: i64,
    pub remind_at: i64,
    pub active: bool,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            event_id: reminder.event_id,
            user_id: reminder.user_id,
            delai: reminder.delay.minutes(),
            remind_at: reminder.remind_at,
            active: reminder.active,
        }
    }
}

/// Bounds of a sweep as RFC 3339 UTC timestamps
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SweepWindowDTO {
    pub from: String,
    pub to: String,
}

impl SweepWindowDTO {
    pub fn new(window: &SweepWindow) -> Self {
        Self {
            from: format_rfc3339(window.from),
            to: format_rfc3339(window.to),
        }
    }
}
