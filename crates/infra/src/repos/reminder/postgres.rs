use super::IReminderRepo;
use anyhow::Context;
use aurora_fest_domain::{Reminder, ReminderDelay, SweepWindow, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_id: i64,
    user_id: i64,
    event_id: i64,
    delay_minutes: i32,
    remind_at: i64,
    active: bool,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> Result<Self, Self::Error> {
        let delay = ReminderDelay::try_from(i64::from(raw.delay_minutes))
            .with_context(|| format!("Reminder: {} has an invalid delay", raw.reminder_id))?;
        Ok(Self {
            id: raw.reminder_id.into(),
            user_id: raw.user_id.into(),
            event_id: raw.event_id.into(),
            delay,
            remind_at: raw.remind_at,
            active: raw.active,
        })
    }
}

fn into_reminders(rows: Vec<ReminderRaw>) -> anyhow::Result<Vec<Reminder>> {
    rows.into_iter().map(Reminder::try_from).collect()
}

#[derive(Debug, FromRow)]
struct CountRaw {
    count: i64,
}

#[derive(Debug, FromRow)]
struct EventIdRaw {
    event_id: i64,
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn upsert_active(
        &self,
        user_id: &ID,
        event_id: &ID,
        delay: ReminderDelay,
        remind_at: i64,
    ) -> anyhow::Result<Reminder> {
        let reminder = sqlx::query_as::<_, ReminderRaw>(
            r#"
            INSERT INTO reminders(user_id, event_id, delay_minutes, remind_at, active)
            VALUES($1, $2, $3, $4, TRUE)
            ON CONFLICT (user_id, event_id, delay_minutes)
            DO UPDATE SET active = TRUE, remind_at = EXCLUDED.remind_at
            RETURNING reminder_id, user_id, event_id, delay_minutes, remind_at, active
            "#,
        )
        .bind(user_id.inner())
        .bind(event_id.inner())
        .bind(delay.minutes() as i32)
        .bind(remind_at)
        .fetch_one(&self.pool)
        .await?;
        reminder.try_into()
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        let reminder = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT reminder_id, user_id, event_id, delay_minutes, remind_at, active FROM reminders
            WHERE reminder_id = $1
            "#,
        )
        .bind(reminder_id.inner())
        .fetch_optional(&self.pool)
        .await?;
        reminder.map(Reminder::try_from).transpose()
    }

    async fn find_due(&self, window: &SweepWindow, limit: i64) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT reminder_id, user_id, event_id, delay_minutes, remind_at, active FROM reminders
            WHERE active
            AND remind_at <= $1
            AND ($2::BIGINT IS NULL OR remind_at > $2)
            ORDER BY remind_at ASC, reminder_id ASC
            LIMIT $3
            "#,
        )
        .bind(window.to)
        .bind(window.lower_bound())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        into_reminders(reminders)
    }

    async fn deactivate(&self, reminder_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET active = FALSE
            WHERE reminder_id = $1
            "#,
        )
        .bind(reminder_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn deactivate_for_event(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET active = FALSE
            WHERE user_id = $1 AND event_id = $2 AND active
            "#,
        )
        .bind(user_id.inner())
        .bind(event_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }

    async fn count_for_event(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<u64> {
        let res = sqlx::query_as::<_, CountRaw>(
            r#"
            SELECT COUNT(*) AS count FROM reminders
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id.inner())
        .bind(event_id.inner())
        .fetch_one(&self.pool)
        .await?;
        Ok(res.count as u64)
    }

    async fn has_active(&self, user_id: &ID, event_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query_as::<_, CountRaw>(
            r#"
            SELECT COUNT(*) AS count FROM reminders
            WHERE user_id = $1 AND event_id = $2 AND active
            "#,
        )
        .bind(user_id.inner())
        .bind(event_id.inner())
        .fetch_one(&self.pool)
        .await?;
        Ok(res.count > 0)
    }

    async fn find_active_event_ids(&self, user_id: &ID) -> anyhow::Result<Vec<ID>> {
        let rows = sqlx::query_as::<_, EventIdRaw>(
            r#"
            SELECT DISTINCT event_id FROM reminders
            WHERE user_id = $1 AND active
            ORDER BY event_id ASC
            "#,
        )
        .bind(user_id.inner())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|row| row.event_id.into()).collect())
    }

    async fn reschedule_for_event(
        &self,
        event_id: &ID,
        event_start_ts: i64,
        now: i64,
    ) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET remind_at = $2 - delay_minutes::BIGINT * 60000,
            active = ($2 - delay_minutes::BIGINT * 60000) > $3
            WHERE event_id = $1 AND active
            "#,
        )
        .bind(event_id.inner())
        .bind(event_start_ts)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected())
    }
}
