mod inmemory;
mod postgres;

use aurora_fest_domain::{Reminder, ReminderDelay, SweepWindow, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Creates the `Reminder` for (user, event, delay) or reactivates the
    /// existing one with a refreshed fire time
    async fn upsert_active(
        &self,
        user_id: &ID,
        event_id: &ID,
        delay: ReminderDelay,
        remind_at: i64,
    ) -> anyhow::Result<Reminder>;
    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>>;
    /// Active reminders firing within the `SweepWindow`, soonest first
    async fn find_due(&self, window: &SweepWindow, limit: i64) -> anyhow::Result<Vec<Reminder>>;
    async fn deactivate(&self, reminder_id: &ID) -> anyhow::Result<()>;
    /// Deactivates every active reminder of the user for the event and
    /// returns how many were deactivated
    async fn deactivate_for_event(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<u64>;
    /// Number of reminders, active or not, the user has for the event
    async fn count_for_event(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<u64>;
    async fn has_active(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<bool>;
    /// Distinct ids of the events the user has an active reminder for, ascending
    async fn find_active_event_ids(&self, user_id: &ID) -> anyhow::Result<Vec<ID>>;
    /// Moves every active reminder of the event to `event_start_ts - delay`.
    /// Reminders whose new fire time is not after `now` are deactivated.
    /// Returns how many reminders were moved.
    async fn reschedule_for_event(
        &self,
        event_id: &ID,
        event_start_ts: i64,
        now: i64,
    ) -> anyhow::Result<u64>;
}
