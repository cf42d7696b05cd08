//! Temporal scanning of free-form text.
//!
//! Recognizes the date and time shapes a casual event description
//! uses:
//! - Absolute dates: "January 15, 2024", "2024-01-15", "1/15/2024"
//! - Relative dates: "tomorrow", "next Tuesday", "in 2 weeks"
//! - Deadline phrasing: "by Friday", "due tomorrow"
//! - Clock times: "3pm", "15:30", "noon"
//! - Time ranges: "2pm to 4pm", "2-4pm"
//!
//! Recurring patterns ("every Monday") are out of scope; the bare
//! weekday inside them still resolves as a plain date.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use regex::Regex;

// ============================================================================
// Types
// ============================================================================

/// A partially resolved calendar stamp: a date, a clock time, or both.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParsedStamp {
    /// The resolved calendar date, if the text carried one.
    pub date: Option<NaiveDate>,
    /// The resolved clock time, if the text carried one.
    pub time: Option<NaiveTime>,
}

impl ParsedStamp {
    fn from_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            time: None,
        }
    }

    fn from_time(time: NaiveTime) -> Self {
        Self {
            date: None,
            time: Some(time),
        }
    }
}

/// The shape of a recognized temporal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// An absolute date ("2024-01-15", "January 15").
    Absolute,
    /// A date relative to the reference date ("tomorrow", "next Monday").
    Relative,
    /// A deadline phrasing resolved as a plain date ("by Friday").
    Deadline,
    /// Just a clock time, no date ("3pm").
    TimeOnly,
    /// A clock-time range with an explicit end ("2pm to 4pm").
    TimeRange,
}

/// One recognized temporal expression within the input text.
#[derive(Debug, Clone)]
pub struct DateMention {
    /// The matched text.
    pub text: String,
    /// The resolved stamp.
    pub stamp: ParsedStamp,
    /// The shape of the expression.
    pub kind: DateKind,
    /// Confidence score (0.0-1.0).
    pub confidence: f32,
    /// Byte offset where the match starts.
    pub start: usize,
    /// Byte offset where the match ends.
    pub end: usize,
    /// Explicit range end, for [`DateKind::TimeRange`] mentions.
    pub range_end: Option<ParsedStamp>,
}

// ============================================================================
// Temporal Parser
// ============================================================================

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

/// Scanner for date and time expressions.
pub struct TemporalParser {
    /// Reference date for relative calculations (defaults to today).
    reference_date: NaiveDate,
}

impl Default for TemporalParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TemporalParser {
    /// Create a parser anchored at today's local calendar date.
    ///
    /// Relative expressions resolve against the process-local "today";
    /// this is the service's one environmental dependency.
    pub fn new() -> Self {
        Self {
            reference_date: Local::now().date_naive(),
        }
    }

    /// Create a parser with a specific reference date.
    pub fn with_reference_date(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// The reference date used for relative resolution.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Scan the text for temporal expressions.
    ///
    /// Returns mentions sorted by start offset with overlapping spans
    /// resolved in favor of the higher-confidence match, so callers
    /// can treat the result as a disjoint left-to-right candidate list.
    pub fn parse(&self, text: &str) -> Vec<DateMention> {
        let mut mentions = Vec::new();

        mentions.extend(self.scan_time_ranges(text));
        mentions.extend(self.scan_clock_times(text));
        mentions.extend(self.scan_absolute_dates(text));
        mentions.extend(self.scan_relative_dates(text));
        mentions.extend(self.scan_deadlines(text));

        mentions.sort_by_key(|m| m.start);
        Self::remove_overlaps(&mut mentions);

        mentions
    }

    /// Drop overlapping mentions, keeping the higher-confidence one.
    fn remove_overlaps(mentions: &mut Vec<DateMention>) {
        let mut i = 0;
        while i + 1 < mentions.len() {
            if mentions[i + 1].start < mentions[i].end {
                if mentions[i].confidence >= mentions[i + 1].confidence {
                    mentions.remove(i + 1);
                } else {
                    mentions.remove(i);
                }
            } else {
                i += 1;
            }
        }
    }

    // ========================================================================
    // Absolute dates
    // ========================================================================

    fn scan_absolute_dates(&self, text: &str) -> Vec<DateMention> {
        let mut mentions = Vec::new();

        // ISO format: 2024-01-15
        let iso = Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("Invalid regex");
        for cap in iso.captures_iter(text) {
            let (Ok(year), Ok(month), Ok(day)) = (
                cap[1].parse::<i32>(),
                cap[2].parse::<u32>(),
                cap[3].parse::<u32>(),
            ) else {
                continue;
            };
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let m = cap.get(0).unwrap();
                mentions.push(DateMention {
                    text: m.as_str().to_string(),
                    stamp: ParsedStamp::from_date(date),
                    kind: DateKind::Absolute,
                    confidence: 0.95,
                    start: m.start(),
                    end: m.end(),
                    range_end: None,
                });
            }
        }

        // Month-name format: January 15[, 2024]
        let month_name = Regex::new(
            r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s*(\d{4})?\b",
        )
        .expect("Invalid regex");
        for cap in month_name.captures_iter(text) {
            let Some(month) = month_number(&cap[1]) else {
                continue;
            };
            let Ok(day) = cap[2].parse::<u32>() else {
                continue;
            };
            let year = cap
                .get(3)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .unwrap_or(self.reference_date.year());

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let m = cap.get(0).unwrap();
                mentions.push(DateMention {
                    text: m.as_str().to_string(),
                    stamp: ParsedStamp::from_date(date),
                    kind: DateKind::Absolute,
                    confidence: 0.9,
                    start: m.start(),
                    end: m.end(),
                    range_end: None,
                });
            }
        }

        // Numeric format: 1/15/2024 (US month-first order assumed)
        let numeric = Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{2,4})\b").expect("Invalid regex");
        for cap in numeric.captures_iter(text) {
            let (Ok(month), Ok(day), Ok(year)) = (
                cap[1].parse::<u32>(),
                cap[2].parse::<u32>(),
                cap[3].parse::<i32>(),
            ) else {
                continue;
            };
            let year = if year < 100 { 2000 + year } else { year };
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let m = cap.get(0).unwrap();
                mentions.push(DateMention {
                    text: m.as_str().to_string(),
                    stamp: ParsedStamp::from_date(date),
                    kind: DateKind::Absolute,
                    confidence: 0.8, // lower confidence: day/month order is ambiguous
                    start: m.start(),
                    end: m.end(),
                    range_end: None,
                });
            }
        }

        mentions
    }

    // ========================================================================
    // Relative dates
    // ========================================================================

    fn scan_relative_dates(&self, text: &str) -> Vec<DateMention> {
        let mut mentions = Vec::new();
        let text_lower = text.to_lowercase();

        // Day-offset terms. "day after tomorrow" must run before "tomorrow"
        // so the longer phrase claims the span first.
        let offset_terms = [
            ("day after tomorrow", 2i64),
            ("tomorrow", 1),
            ("today", 0),
            ("tonight", 0),
        ];
        for (term, days) in &offset_terms {
            let mut search_from = 0;
            while let Some(rel) = text_lower[search_from..].find(term) {
                let pos = search_from + rel;
                search_from = pos + term.len();
                if mentions
                    .iter()
                    .any(|m: &DateMention| pos >= m.start && pos < m.end)
                {
                    continue;
                }
                let date = self.reference_date + Duration::days(*days);
                mentions.push(DateMention {
                    text: term.to_string(),
                    stamp: ParsedStamp::from_date(date),
                    kind: DateKind::Relative,
                    confidence: 0.95,
                    start: pos,
                    end: pos + term.len(),
                    range_end: None,
                });
            }
        }

        // "next/this [weekday]" and bare weekday names
        let weekday = Regex::new(
            r"(?i)\b(next\s+|this\s+|last\s+|every\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
        )
        .expect("Invalid regex");
        for cap in weekday.captures_iter(text) {
            let qualifier = cap
                .get(1)
                .map(|m| m.as_str().trim().to_lowercase())
                .unwrap_or_default();
            // "last Monday" is in the past; leave it unresolved.
            if qualifier == "last" {
                continue;
            }
            let Some(day) = weekday_from_name(&cap[2]) else {
                continue;
            };
            let skip_this_week = qualifier == "next";
            let date = self.next_weekday(day, skip_this_week);
            let m = cap.get(0).unwrap();
            let confidence = if qualifier.is_empty() { 0.75 } else { 0.9 };
            mentions.push(DateMention {
                text: m.as_str().to_string(),
                stamp: ParsedStamp::from_date(date),
                kind: DateKind::Relative,
                confidence,
                start: m.start(),
                end: m.end(),
                range_end: None,
            });
        }

        // "in N days/weeks/months/years"
        let in_n = Regex::new(r"(?i)\bin\s+(\d+)\s+(days?|weeks?|months?|years?)\b")
            .expect("Invalid regex");
        for cap in in_n.captures_iter(text) {
            let Ok(n) = cap[1].parse::<i64>() else {
                continue;
            };
            let unit = cap[2].to_lowercase();
            let date = match unit.as_str() {
                "day" | "days" => self.reference_date + Duration::days(n),
                "week" | "weeks" => self.reference_date + Duration::weeks(n),
                "month" | "months" => add_months(self.reference_date, n as i32)
                    .unwrap_or(self.reference_date),
                "year" | "years" => NaiveDate::from_ymd_opt(
                    self.reference_date.year() + n as i32,
                    self.reference_date.month(),
                    self.reference_date.day(),
                )
                .unwrap_or(self.reference_date),
                _ => continue,
            };
            let m = cap.get(0).unwrap();
            mentions.push(DateMention {
                text: m.as_str().to_string(),
                stamp: ParsedStamp::from_date(date),
                kind: DateKind::Relative,
                confidence: 0.9,
                start: m.start(),
                end: m.end(),
                range_end: None,
            });
        }

        // "end of week/month/year"
        let end_of = Regex::new(r"(?i)\bend\s+of\s+(?:the\s+)?(week|month|year)\b")
            .expect("Invalid regex");
        for cap in end_of.captures_iter(text) {
            let date = match cap[1].to_lowercase().as_str() {
                "week" => self.end_of_week(),
                "month" => self.end_of_month(),
                "year" => NaiveDate::from_ymd_opt(self.reference_date.year(), 12, 31)
                    .unwrap_or(self.reference_date),
                _ => continue,
            };
            let m = cap.get(0).unwrap();
            mentions.push(DateMention {
                text: m.as_str().to_string(),
                stamp: ParsedStamp::from_date(date),
                kind: DateKind::Relative,
                confidence: 0.85,
                start: m.start(),
                end: m.end(),
                range_end: None,
            });
        }

        mentions
    }

    // ========================================================================
    // Clock times
    // ========================================================================

    fn scan_clock_times(&self, text: &str) -> Vec<DateMention> {
        let mut mentions = Vec::new();

        // 12-hour format: 3pm, 3:30pm, 3:30 PM
        let twelve_hour = Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm|a\.m\.|p\.m\.)\b")
            .expect("Invalid regex");
        for cap in twelve_hour.captures_iter(text) {
            let Ok(hour) = cap[1].parse::<u32>() else {
                continue;
            };
            let minute = cap
                .get(2)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            let pm = cap[3].to_lowercase().starts_with('p');
            if let Some(time) = twelve_hour_time(hour, minute, pm) {
                let m = cap.get(0).unwrap();
                mentions.push(DateMention {
                    text: m.as_str().to_string(),
                    stamp: ParsedStamp::from_time(time),
                    kind: DateKind::TimeOnly,
                    confidence: 0.95,
                    start: m.start(),
                    end: m.end(),
                    range_end: None,
                });
            }
        }

        // 24-hour format: 15:30, 09:00
        let twenty_four = Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").expect("Invalid regex");
        for cap in twenty_four.captures_iter(text) {
            let (Ok(hour), Ok(minute)) = (cap[1].parse::<u32>(), cap[2].parse::<u32>()) else {
                continue;
            };
            if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
                let m = cap.get(0).unwrap();
                mentions.push(DateMention {
                    text: m.as_str().to_string(),
                    stamp: ParsedStamp::from_time(time),
                    kind: DateKind::TimeOnly,
                    confidence: 0.85,
                    start: m.start(),
                    end: m.end(),
                    range_end: None,
                });
            }
        }

        // Named times of day
        let named_times = [
            ("end of day", 17, 0),
            ("midnight", 0, 0),
            ("midday", 12, 0),
            ("noon", 12, 0),
            ("morning", 9, 0),
            ("afternoon", 14, 0),
            ("evening", 18, 0),
        ];
        let text_lower = text.to_lowercase();
        for (name, hour, minute) in &named_times {
            if let Some(pos) = text_lower.find(name) {
                let Some(time) = NaiveTime::from_hms_opt(*hour, *minute, 0) else {
                    continue;
                };
                mentions.push(DateMention {
                    text: name.to_string(),
                    stamp: ParsedStamp::from_time(time),
                    kind: DateKind::TimeOnly,
                    confidence: 0.8,
                    start: pos,
                    end: pos + name.len(),
                    range_end: None,
                });
            }
        }

        mentions
    }

    // ========================================================================
    // Time ranges
    // ========================================================================

    fn scan_time_ranges(&self, text: &str) -> Vec<DateMention> {
        let mut mentions = Vec::new();

        // "2pm to 4pm", "2-4pm", "from 2:30pm until 4pm". The closing
        // meridiem is mandatory so bare number pairs don't match.
        let range = Regex::new(
            r"(?i)\b(?:from\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*(?:-|–|to|until)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b",
        )
        .expect("Invalid regex");
        for cap in range.captures_iter(text) {
            let (Ok(start_hour), Ok(end_hour)) = (cap[1].parse::<u32>(), cap[4].parse::<u32>())
            else {
                continue;
            };
            let start_minute = cap
                .get(2)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            let end_minute = cap
                .get(5)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            let end_pm = cap[6].to_lowercase().starts_with('p');

            let Some(end_time) = twelve_hour_time(end_hour, end_minute, end_pm) else {
                continue;
            };

            // An unqualified start hour borrows the end's meridiem when
            // that keeps the range forward ("2-4pm" means 2pm).
            let start_time = match cap.get(3) {
                Some(mer) => {
                    let pm = mer.as_str().to_lowercase().starts_with('p');
                    twelve_hour_time(start_hour, start_minute, pm)
                }
                None => twelve_hour_time(start_hour, start_minute, end_pm)
                    .filter(|t| *t < end_time)
                    .or_else(|| twelve_hour_time(start_hour, start_minute, false)),
            };
            let Some(start_time) = start_time else {
                continue;
            };

            let m = cap.get(0).unwrap();
            mentions.push(DateMention {
                text: m.as_str().to_string(),
                stamp: ParsedStamp::from_time(start_time),
                kind: DateKind::TimeRange,
                confidence: 0.97,
                start: m.start(),
                end: m.end(),
                range_end: Some(ParsedStamp::from_time(end_time)),
            });
        }

        mentions
    }

    // ========================================================================
    // Deadlines
    // ========================================================================

    fn scan_deadlines(&self, text: &str) -> Vec<DateMention> {
        let mut mentions = Vec::new();

        // "by Friday", "due next Monday", "before tomorrow". Resolved as
        // plain dates; the deadline flavor only raises confidence over a
        // bare weekday mention.
        let deadline = Regex::new(
            r"(?i)\b(?:by|due|before|until)\s+(?:(next)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday|today|tomorrow)\b",
        )
        .expect("Invalid regex");
        for cap in deadline.captures_iter(text) {
            let target = cap[2].to_lowercase();
            let date = match target.as_str() {
                "today" => self.reference_date,
                "tomorrow" => self.reference_date + Duration::days(1),
                name => {
                    let Some(day) = weekday_from_name(name) else {
                        continue;
                    };
                    self.next_weekday(day, cap.get(1).is_some())
                }
            };
            let m = cap.get(0).unwrap();
            mentions.push(DateMention {
                text: m.as_str().to_string(),
                stamp: ParsedStamp::from_date(date),
                kind: DateKind::Deadline,
                confidence: 0.9,
                start: m.start(),
                end: m.end(),
                range_end: None,
            });
        }

        mentions
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Next occurrence of a weekday on or after the reference date.
    fn next_weekday(&self, target: Weekday, skip_this_week: bool) -> NaiveDate {
        let current = self.reference_date.weekday().num_days_from_monday();
        let wanted = target.num_days_from_monday();

        let mut days_ahead = if wanted >= current {
            (wanted - current) as i64
        } else {
            (7 - current + wanted) as i64
        };
        if skip_this_week && days_ahead < 7 {
            days_ahead += 7;
        }

        self.reference_date + Duration::days(days_ahead)
    }

    /// End of the current week (Sunday).
    fn end_of_week(&self) -> NaiveDate {
        let days_until_sunday = 6 - self.reference_date.weekday().num_days_from_monday() as i64;
        self.reference_date + Duration::days(days_until_sunday)
    }

    /// Last day of the current month.
    fn end_of_month(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.reference_date.year(), self.reference_date.month(), 1)
            .and_then(|first| add_months(first, 1))
            .map(|next_first| next_first - Duration::days(1))
            .unwrap_or(self.reference_date)
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let lower = name.to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, day)| *day)
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sept" | "sep" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// Convert a 12-hour clock reading into a `NaiveTime`.
fn twelve_hour_time(hour: u32, minute: u32, pm: bool) -> Option<NaiveTime> {
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) if h < 12 => h + 12,
        (h, _) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Add calendar months, clamping the day into the target month.
fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month() as i32 - 1 + months;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12) + 1) as u32;

    NaiveDate::from_ymd_opt(year, month, date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 30))
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 29))
        .or_else(|| NaiveDate::from_ymd_opt(year, month, 28))
}

// ============================================================================
// Tests
// ============================================================================
