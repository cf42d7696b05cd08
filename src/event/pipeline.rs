//! Orchestration of one natural-language ingestion.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, Result};
use crate::extract::{DateTimeExtractor, TitleExtractor};
use crate::store::EventStore;

use super::conflict::find_conflicts;
use super::types::Event;

/// Why an input was rejected before anything was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Missing or empty input text.
    InvalidInput,
    /// No temporal expression could be resolved from the text.
    NoDateFound,
}

/// Outcome of one ingestion attempt.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// The input was rejected; nothing was persisted.
    Rejected(RejectReason),
    /// The proposed event overlaps existing events; nothing was
    /// persisted. The caller may edit and resubmit, or resubmit with
    /// force.
    Conflict {
        /// Every overlapping existing event, in collection order.
        conflicts: Vec<Event>,
        /// The event that would have been created.
        proposed: Event,
    },
    /// The event was created and durably persisted.
    Created(Event),
}

/// The natural-language ingestion pipeline.
///
/// Owns the extractors and the store handle, plus the write guard that
/// makes the read-detect-append round trip atomic across concurrent
/// ingestions: without it, two overlapping requests could each pass
/// conflict detection against the same snapshot and both persist.
pub struct IngestionPipeline {
    store: Arc<dyn EventStore>,
    dates: DateTimeExtractor,
    titles: TitleExtractor,
    write_guard: Mutex<()>,
}

impl IngestionPipeline {
    /// Create a pipeline over the given store.
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            dates: DateTimeExtractor::new(),
            titles: TitleExtractor::new(),
            write_guard: Mutex::new(()),
        }
    }

    /// Create a pipeline with a fixed reference date for the date
    /// extractor.
    pub fn with_reference_date(store: Arc<dyn EventStore>, reference_date: NaiveDate) -> Self {
        Self {
            store,
            dates: DateTimeExtractor::with_reference_date(reference_date),
            titles: TitleExtractor::new(),
            write_guard: Mutex::new(()),
        }
    }

    /// Ingest one free-form event description.
    ///
    /// With `force` set, conflicts are still computed but do not block
    /// persistence. A conflict outcome requires a fresh caller-initiated
    /// submission; the pipeline never reschedules on its own.
    pub async fn ingest(&self, text: &str, force: bool) -> Result<IngestOutcome> {
        if text.trim().is_empty() {
            return Ok(IngestOutcome::Rejected(RejectReason::InvalidInput));
        }

        let window = match self.dates.extract(text) {
            Ok(window) => window,
            Err(ExtractError::NoDateFound) => {
                debug!(text, "no temporal expression found");
                return Ok(IngestOutcome::Rejected(RejectReason::NoDateFound));
            }
        };

        let title = self.titles.extract(text);
        let proposed = Event::new(title, window.start)
            .with_end(window.end)
            .with_all_day(window.all_day);

        // Hold the guard across read + detect + append so concurrent
        // ingestions serialize on the same snapshot.
        let _guard = self.write_guard.lock().await;

        let existing = self.store.read_all().await?;
        let conflicts = find_conflicts(&proposed, &existing);

        if !conflicts.is_empty() {
            if !force {
                debug!(
                    title = %proposed.title,
                    conflicts = conflicts.len(),
                    "conflict detected, event discarded"
                );
                return Ok(IngestOutcome::Conflict {
                    conflicts,
                    proposed,
                });
            }
            warn!(
                title = %proposed.title,
                overridden = conflicts.len(),
                "persisting despite conflicts"
            );
        }

        self.store.append(proposed.clone()).await?;
        info!(id = %proposed.id, title = %proposed.title, "event created");
        Ok(IngestOutcome::Created(proposed))
    }
}

// ============================================================================
// Tests
// ============================================================================
