use crate::{date::format_rfc3339, event::FestivalEvent, reminder::Reminder, shared::entity::ID};
use serde::Serialize;

/// Name of the push event published when a `Reminder` fires
pub const REMINDER_PUSH_EVENT: &str = "rappel";

const PRIVATE_USER_CHANNEL_PREFIX: &str = "private-user-";

/// The private push channel only the given `User` may subscribe to
pub fn user_channel(user_id: &ID) -> String {
    format!("{}{}", PRIVATE_USER_CHANNEL_PREFIX, user_id)
}

/// Resolves the `User` owning a private user channel.
///
/// Returns `None` for any channel that is not exactly `private-user-<id>`.
pub fn channel_owner(channel: &str) -> Option<ID> {
    let suffix = channel.strip_prefix(PRIVATE_USER_CHANNEL_PREFIX)?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Socket ids handed out by the push broker look like `1234.5678`
pub fn is_valid_socket_id(socket_id: &str) -> bool {
    match socket_id.split_once('.') {
        Some((left, right)) => {
            !left.is_empty()
                && !right.is_empty()
                && left.chars().all(|c| c.is_ascii_digit())
                && right.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Payload pushed to the user channel when a `Reminder` fires.
/// Field names are consumed as is by the web and mobile clients.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReminderPush {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "eventId")]
    pub event_id: ID,
    pub titre: String,
    pub delai: i64,
    pub date_debut: String,
    pub rappel_id: ID,
}

impl ReminderPush {
    pub fn new(reminder: &Reminder, event: &FestivalEvent) -> Self {
        Self {
            kind: REMINDER_PUSH_EVENT,
            event_id: event.id,
            titre: event.title.clone(),
            delai: reminder.delay.minutes(),
            date_debut: format_rfc3339(event.start_ts),
            rappel_id: reminder.id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ReminderDelay;
    use serde_json::json;

    #[test]
    fn user_channels_round_trip_to_their_owner() {
        let user_id = ID::from(42);
        let channel = user_channel(&user_id);
        assert_eq!(channel, "private-user-42");
        assert_eq!(channel_owner(&channel), Some(user_id));
    }

    #[test]
    fn rejects_foreign_channel_names() {
        assert_eq!(channel_owner("private-user-"), None);
        assert_eq!(channel_owner("private-user-0"), None);
        assert_eq!(channel_owner("private-user-+4"), None);
        assert_eq!(channel_owner("private-user-4x"), None);
        assert_eq!(channel_owner("presence-user-4"), None);
        assert_eq!(channel_owner("private-admin-user-4"), None);
        assert_eq!(channel_owner("user-4"), None);
    }

    #[test]
    fn validates_socket_ids() {
        assert!(is_valid_socket_id("123.456"));
        assert!(!is_valid_socket_id("123"));
        assert!(!is_valid_socket_id("123."));
        assert!(!is_valid_socket_id(".456"));
        assert!(!is_valid_socket_id("12a.456"));
        assert!(!is_valid_socket_id("1.2.3"));
    }

    #[test]
    fn serializes_reminder_push() {
        let event = FestivalEvent {
            id: ID::from(7),
            title: "Headliner".into(),
            start_ts: 1720809000000,
            end_ts: None,
        };
        let reminder = Reminder {
            id: ID::from(99),
            user_id: ID::from(3),
            event_id: event.id,
            delay: ReminderDelay::ThirtyMinutes,
            remind_at: ReminderDelay::ThirtyMinutes.remind_at(event.start_ts),
            active: true,
        };

        let payload = serde_json::to_value(ReminderPush::new(&reminder, &event)).unwrap();
        assert_eq!(
            payload,
            json!({
                "type": "rappel",
                "eventId": 7,
                "titre": "Headliner",
                "delai": 30,
                "date_debut": "2024-07-12T18:30:00.000Z",
                "rappel_id": 99
            })
        );
    }
}
