use super::IEventRepo;
use aurora_fest_domain::{FestivalEvent, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_id: i64,
    title: String,
    start_ts: i64,
    end_ts: Option<i64>,
}

impl From<EventRaw> for FestivalEvent {
    fn from(raw: EventRaw) -> Self {
        Self {
            id: raw.event_id.into(),
            title: raw.title,
            start_ts: raw.start_ts,
            end_ts: raw.end_ts,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, event: &FestivalEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events(event_id, title, start_ts, end_ts)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(event.id.inner())
        .bind(&event.title)
        .bind(event.start_ts)
        .bind(event.end_ts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, event: &FestivalEvent) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE events
            SET title = $2,
            start_ts = $3,
            end_ts = $4
            WHERE event_id = $1
            "#,
        )
        .bind(event.id.inner())
        .bind(&event.title)
        .bind(event.start_ts)
        .bind(event.end_ts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<FestivalEvent>> {
        let event = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT event_id, title, start_ts, end_ts FROM events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id.inner())
        .fetch_optional(&self.pool)
        .await?;
        Ok(event.map(|e| e.into()))
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<FestivalEvent>> {
        let event_ids = event_ids.iter().map(|id| id.inner()).collect::<Vec<_>>();
        let events = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT event_id, title, start_ts, end_ts FROM events
            WHERE event_id = ANY($1)
            "#,
        )
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(events.into_iter().map(|e| e.into()).collect())
    }
}
