//! Multi-layout timestamp parsing.
//!
//! Layouts are tried strictly in [`TIMESTAMP_LAYOUTS`] order and the first match wins, so the same
//! text always resolves through the same layout. Longer layouts come before their shorter
//! prefixes, and day-first layouts come before month-first ones: `03/04/2025` is the 3rd of April.
//! Day, month and hour fields may omit their leading zero (`3/4/2025`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// One accepted timestamp layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampLayout {
    /// RFC 3339 with an explicit zone, with or without fractional seconds. Date and time must be
    /// joined by `T`; the space-separated form is not accepted.
    Rfc3339,
    /// Date and time without zone, interpreted as UTC (`chrono` format string).
    DateTime(&'static str),
    /// Date only, interpreted as midnight UTC (`chrono` format string).
    Date(&'static str),
}

impl TimestampLayout {
    fn parse(self, text: &str) -> Option<DateTime<Utc>> {
        match self {
            Self::Rfc3339 if text.as_bytes().get(10) == Some(&b'T') => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            Self::Rfc3339 => None,
            Self::DateTime(fmt) => NaiveDateTime::parse_from_str(text, fmt)
                .ok()
                .map(|ts| ts.and_utc()),
            Self::Date(fmt) => NaiveDate::parse_from_str(text, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|ts| ts.and_utc()),
        }
    }
}

/// Accepted layouts, in match order.
pub const TIMESTAMP_LAYOUTS: &[TimestampLayout] = &[
    TimestampLayout::Rfc3339,
    TimestampLayout::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    TimestampLayout::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    TimestampLayout::DateTime("%Y-%m-%d %H:%M"),
    TimestampLayout::Date("%Y-%m-%d"),
    TimestampLayout::DateTime("%d/%m/%Y %H:%M:%S"),
    TimestampLayout::DateTime("%d/%m/%Y %H:%M"),
    TimestampLayout::Date("%d/%m/%Y"),
    TimestampLayout::DateTime("%d-%m-%Y %H:%M:%S"),
    TimestampLayout::DateTime("%d-%m-%Y %H:%M"),
    TimestampLayout::Date("%d-%m-%Y"),
    TimestampLayout::DateTime("%m/%d/%Y %H:%M:%S"),
    TimestampLayout::DateTime("%m/%d/%Y %H:%M"),
    TimestampLayout::Date("%m/%d/%Y"),
    TimestampLayout::DateTime("%Y/%m/%d %H:%M:%S"),
    TimestampLayout::DateTime("%Y/%m/%d %H:%M"),
    TimestampLayout::Date("%Y/%m/%d"),
];

/// Parse a textual timestamp against [`TIMESTAMP_LAYOUTS`].
///
/// Surrounding whitespace is ignored. Returns `None` for empty or unrecognized input.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    matching_layout(text).map(|(_, ts)| ts)
}

/// Like [`parse_timestamp`], but also reports which layout matched.
pub fn matching_layout(text: &str) -> Option<(TimestampLayout, DateTime<Utc>)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(text).map(|ts| (*layout, ts)))
}
