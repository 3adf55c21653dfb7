use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use aurora_fest_domain::{FestivalEvent, ID};

pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<FestivalEvent>>,
}

impl InMemoryEventRepo {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, event: &FestivalEvent) -> anyhow::Result<()> {
        insert(event, &self.events);
        Ok(())
    }

    async fn save(&self, event: &FestivalEvent) -> anyhow::Result<()> {
        save(event, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<FestivalEvent>> {
        Ok(find(event_id, &self.events))
    }

    async fn find_many(&self, event_ids: &[ID]) -> anyhow::Result<Vec<FestivalEvent>> {
        Ok(find_by(&self.events, |event| event_ids.contains(&event.id)))
    }
}
