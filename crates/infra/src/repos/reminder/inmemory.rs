use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use aurora_fest_domain::{Reminder, ReminderDelay, SweepWindow, ID};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex,
};

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    next_id: AtomicI64,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(vec![]),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn upsert_active(
        &self,
        user_id: &ID,
        event_id: &ID,
        delay: ReminderDelay,
        remind_at: i64,
    ) -> anyhow::Result<Reminder> {
        // Find or insert under one lock, like the unique index does for postgres
        let mut reminders = self.reminders.lock().unwrap();
        let existing = reminders
            .iter_mut()
            .find(|r| r.user_id == *user_id && r.event_id == *event_id && r.delay == delay);
        let reminder = match existing {
            Some(reminder) => {
                reminder.active = true;
                reminder.remind_at = remind_at;
                reminder.clone()
            }
            None => {
                let reminder = Reminder {
                    id: ID::from(self.next_id.fetch_add(1, Ordering::SeqCst)),
                    user_id: *user_id,
                    event_id: *event_id,
                    delay,
                    remind_at,
                    active: true,
                };
                reminders.push(reminder.clone());
                reminder
            }
        };
        Ok(reminder)
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        Ok(find(reminder_id, &self.reminders))
    }

    async fn find_due(&self, window: &SweepWindow, limit: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut due = find_by(&self.reminders, |r| r.active && window.contains(r.remind_at));
        due.sort_by_key(|r| (r.remind_at, r.id));
        due.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(due)
    }

    async fn deactivate(&self, reminder_id: &ID) -> anyhow::Result<()> {
        update_many(&self.reminders, |r| r.id == *reminder_id, |r| r.active = false);
        Ok(())
    }

    async fn deactivate_for_event(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<u64> {
        Ok(update_many(
            &self.reminders,
            |r| r.active && r.user_id == *user_id && r.event_id == *event_id,
            |r| r.active = false,
        ))
    }

    async fn count_for_event(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<u64> {
        Ok(count_by(&self.reminders, |r| {
            r.user_id == *user_id && r.event_id == *event_id
        }))
    }

    async fn has_active(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<bool> {
        Ok(count_by(&self.reminders, |r| {
            r.active && r.user_id == *user_id && r.event_id == *event_id
        }) > 0)
    }

    async fn find_active_event_ids(&self, user_id: &ID) -> anyhow::Result<Vec<ID>> {
        let mut event_ids = find_by(&self.reminders, |r| r.active && r.user_id == *user_id)
            .into_iter()
            .map(|r| r.event_id)
            .collect::<Vec<_>>();
        event_ids.sort();
        event_ids.dedup();
        Ok(event_ids)
    }

    async fn reschedule_for_event(
        &self,
        event_id: &ID,
        event_start_ts: i64,
        now: i64,
    ) -> anyhow::Result<u64> {
        Ok(update_many(
            &self.reminders,
            |r| r.active && r.event_id == *event_id,
            |r| {
                r.remind_at = r.delay.remind_at(event_start_ts);
                r.active = r.remind_at > now;
            },
        ))
    }
}
