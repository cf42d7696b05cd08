//! Almanac: Calendar Event Service
//!
//! A calendar event service with natural-language event ingestion:
//! free-form text ("Team meeting Thursday at 2pm") is parsed into a
//! structured event, checked against the existing schedule for
//! conflicts, and persisted to a flat JSON-file-backed store.
//!
//! Date resolution has one environmental dependency: relative
//! expressions resolve against the process-local calendar date, and
//! the resulting wall-clock reading is interpreted as a UTC instant.

pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod server;
pub mod store;

pub use api::{create_router, ApiState, RestApiConfig};
pub use config::Config;
pub use error::{AlmanacError, ConfigError, ExtractError, Result, StoreError};
pub use event::{find_conflicts, Event, IngestOutcome, IngestionPipeline, RejectReason};
pub use extract::{DateTimeExtractor, ExtractedDateTime, TemporalParser, TitleExtractor};
pub use server::run_server;
pub use store::{EventStore, JsonFileStore, MemoryStore};
