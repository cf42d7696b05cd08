//! In-memory event store for tests and ephemeral runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::event::Event;

use super::traits::EventStore;

/// Non-durable store keeping events in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn read_all(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn append(&self, event: Event) -> Result<()> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<usize> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|event| !event.matches_id(id));
        Ok(before - events.len())
    }
}
