//! The persisted calendar event record.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event.
///
/// Serialized camelCase to stay wire- and file-compatible with the
/// flat `{ "events": [...] }` document format. Records written by
/// older deployments may lack `id` and `createdAt`; both default on
/// load so legacy files keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Surrogate identifier, generated at creation time.
    #[serde(default = "generate_id")]
    pub id: String,
    /// Human-readable label, bounded to 50 display characters.
    pub title: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant. Legacy records may lack one; see
    /// [`Event::effective_end`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// True when the event covers a calendar date rather than a clock
    /// range.
    #[serde(default)]
    pub all_day: bool,
    /// When the record was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Event {
    /// Create a new event starting at the given instant.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            start,
            end: None,
            all_day: false,
            created_at: Utc::now(),
        }
    }

    /// Set the end instant.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the all-day flag.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// The end instant used for comparisons: a record without an end
    /// compares as zero-length at its start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end.unwrap_or(self.start)
    }

    /// Open-interval overlap: two events sharing only a boundary
    /// instant do not overlap.
    pub fn overlaps_with(&self, other: &Event) -> bool {
        self.start < other.effective_end() && self.effective_end() > other.start
    }

    /// The start instant rendered the way it appears on the wire.
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    /// Legacy composite identity: `"<start>-<title>"`.
    ///
    /// Two events sharing the exact start instant and title share this
    /// identity, so deleting by it removes all of them.
    pub fn composite_id(&self) -> String {
        format!("{}-{}", self.start_rfc3339(), self.title)
    }

    /// Whether a delete address refers to this event, by surrogate id
    /// or by legacy composite identity.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.composite_id() == id
    }
}
