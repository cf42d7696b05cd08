//! Store trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::event::Event;

/// Trait for event store backends.
///
/// Implementations persist durably before returning from a mutation
/// and keep the collection in insertion order. There is no update
/// operation; replacement is delete-then-append at the caller's
/// boundary.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All persisted events, in insertion order.
    async fn read_all(&self) -> Result<Vec<Event>>;

    /// Append one event, persisting before returning.
    async fn append(&self, event: Event) -> Result<()>;

    /// Remove every event the address refers to (surrogate id or
    /// legacy composite identity) and return how many were removed.
    async fn delete(&self, id: &str) -> Result<usize>;
}
