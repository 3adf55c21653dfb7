mod date;
mod event;
mod notification;
mod reminder;
mod shared;
mod signed_link;
mod sweep;
mod user;

pub use date::{format_local, format_rfc3339, FESTIVAL_TIMEZONE};
pub use event::{FestivalEvent, InvalidEventScheduleError};
pub use notification::{
    channel_owner, is_valid_socket_id, user_channel, ReminderPush, REMINDER_PUSH_EVENT,
};
pub use reminder::{
    plan_reminder_slots, CancellationNote, InvalidReminderDelay, Reminder, ReminderDelay,
    ReminderPlanError, ReminderSlot,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use signed_link::{secrets_match, ReminderLinkClaims, ReminderLinkSigner, SIGNATURE_LEN};
pub use sweep::SweepWindow;
pub use user::{User, UserRole};
