//! Event domain: the persisted record, conflict detection, and the
//! natural-language ingestion pipeline.
//!
//! Control flow for one ingestion:
//!
//! ```text
//! text ──▶ DateTimeExtractor ──▶ TitleExtractor ──▶ find_conflicts
//!                                                        │
//!                      conflict: report, nothing persisted
//!                      no conflict: EventStore::append ──▶ created event
//! ```

mod conflict;
mod pipeline;
pub mod types;

pub use conflict::find_conflicts;
pub use pipeline::{IngestOutcome, IngestionPipeline, RejectReason};
pub use types::Event;
