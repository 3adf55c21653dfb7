mod inmemory;
mod postgres;

use aurora_fest_domain::{FestivalEvent, ID};
pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, event: &FestivalEvent) -> anyhow::Result<()>;
    async fn save(&self, event: &FestivalEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<FestivalEvent>>;
    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<FestivalEvent>>;
}
