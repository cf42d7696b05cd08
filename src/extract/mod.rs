//! Natural-language extraction of event fields from free-form text.
//!
//! Extraction runs in two passes over the input sentence:
//!
//! - [`TemporalParser`] scans for date and time expressions and returns
//!   an offset-ordered candidate list.
//! - [`DateTimeExtractor`] turns the first candidate (grouped with a
//!   nearby complement) into a concrete `(start, end, all_day)` triple.
//! - [`TitleExtractor`] independently derives a short human-readable
//!   label from the same text; it never fails.
//!
//! All extraction is pure and synchronous; a reference date is
//! injectable for deterministic tests.

pub mod datetime;
pub mod temporal;
pub mod title;

pub use datetime::{DateTimeExtractor, ExtractedDateTime};
pub use temporal::{DateKind, DateMention, ParsedStamp, TemporalParser};
pub use title::TitleExtractor;
