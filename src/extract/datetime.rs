//! Resolution of temporal mentions into a concrete event window.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::ExtractError;

use super::temporal::{DateMention, TemporalParser};

/// How far apart (in bytes) a date and its clock time may sit and
/// still describe the same moment ("Thursday ... at 2pm").
const GROUP_WINDOW: usize = 50;

/// A resolved event window extracted from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedDateTime {
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant. Defaults to one hour after the start when the text
    /// carries no explicit end.
    pub end: DateTime<Utc>,
    /// True when the text specified only a calendar date, with no
    /// hour-level signal.
    pub all_day: bool,
}

/// Extractor turning raw text into an [`ExtractedDateTime`].
pub struct DateTimeExtractor {
    parser: TemporalParser,
}

impl Default for DateTimeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DateTimeExtractor {
    /// Create an extractor anchored at today.
    pub fn new() -> Self {
        Self {
            parser: TemporalParser::new(),
        }
    }

    /// Create an extractor with a fixed reference date.
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self {
            parser: TemporalParser::with_reference_date(reference_date),
        }
    }

    /// Extract the event window from the text.
    ///
    /// Only the first (left-most) temporal mention is used, grouped
    /// with at most one nearby complement: a clock time completing a
    /// date, or a date completing a clock time. Any further date
    /// mentions in the same text are ignored by design.
    pub fn extract(&self, text: &str) -> Result<ExtractedDateTime, ExtractError> {
        let mentions = self.parser.parse(text);
        let Some(first) = mentions.first() else {
            return Err(ExtractError::NoDateFound);
        };

        let mut date = first.stamp.date;
        let mut time = first.stamp.time;
        let mut range_end = first.range_end.and_then(|s| s.time);

        for mention in mentions.iter().skip(1) {
            if mention.start > first.end + GROUP_WINDOW {
                break;
            }
            if date.is_none() && mention.stamp.date.is_some() {
                date = mention.stamp.date;
            } else if time.is_none() && mention.stamp.time.is_some() {
                time = mention.stamp.time;
                range_end = range_end.or_else(|| mention.range_end.and_then(|s| s.time));
            }
        }

        // A time with no date reads as "today at ...".
        let all_day = time.is_none();
        let date = date.unwrap_or_else(|| self.parser.reference_date());
        let clock = time.unwrap_or(NaiveTime::MIN);

        let start = to_instant(date, clock);
        let end = range_end
            .map(|t| to_instant(date, t))
            .filter(|e| *e > start)
            .unwrap_or_else(|| start + Duration::hours(1));

        Ok(ExtractedDateTime {
            start,
            end,
            all_day,
        })
    }
}

/// Interpret a naive local wall-clock reading as a UTC instant.
///
/// No timezone negotiation happens here; the parser's resolution is
/// taken as-is (see the crate-level environmental note).
fn to_instant(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(NaiveDateTime::new(date, time), Utc)
}

// ============================================================================
// Tests
// ============================================================================
