//! Client-side row filtering.
//!
//! A row is kept when every equality [`Filter`] matches and, if a time column and bounds are
//! configured, its time value lies within the inclusive bounds. Rows whose time value does not
//! parse are not range-checked at all.

use chrono::{DateTime, Utc};

use crate::inference::parse_timestamp;
use crate::types::{format_instant, Filter, Row, TimeRange, Value};

/// Matching quote pairs stripped from filter keys and values.
const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('\u{201C}', '\u{201D}'), ('\u{2018}', '\u{2019}')];

/// Trim whitespace and strip one layer of matching straight or curly quotes.
pub fn trim_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    trimmed
}

/// Inclusive time bounds, already parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBounds {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeBounds {
    /// Parse textual bounds. Empty or unparseable bounds are treated as absent.
    pub fn from_range(range: &TimeRange) -> Self {
        let parse = |bound: &Option<String>| bound.as_deref().and_then(parse_timestamp);
        Self {
            from: parse(&range.from),
            to: parse(&range.to),
        }
    }

    /// Whether any bound is set.
    pub fn is_bounded(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Whether `ts` lies within the bounds, both ends inclusive.
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| *ts >= from) && self.to.is_none_or(|to| *ts <= to)
    }
}

/// Returns the rows that satisfy all `filters` and, when `time_key` is set, the `range`.
pub fn filter_rows(rows: &[Row], filters: &[Filter], time_key: Option<&str>, range: &TimeRange) -> Vec<Row> {
    let bounds = match time_key {
        Some(_) => TimeBounds::from_range(range),
        None => TimeBounds::default(),
    };

    rows.iter()
        .filter(|row| filters_match(row, filters) && within_bounds(row, time_key, &bounds))
        .cloned()
        .collect()
}

/// Whether `row` satisfies every filter. Filters with an empty key are ignored.
pub fn filters_match(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|f| {
        let key = trim_quotes(&f.key);
        if key.is_empty() {
            return true;
        }
        match resolve_field_key(row, key) {
            Some(value) => value_matches(value, &f.value),
            None => false,
        }
    })
}

fn within_bounds(row: &Row, time_key: Option<&str>, bounds: &TimeBounds) -> bool {
    let Some(key) = time_key else {
        return true;
    };
    if !bounds.is_bounded() {
        return true;
    }
    match row.get(key).and_then(time_of) {
        Some(ts) => bounds.contains(&ts),
        None => true,
    }
}

fn time_of(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Instant(ts) => Some(*ts),
        Value::Text(s) => parse_timestamp(s),
        _ => None,
    }
}

/// Look a filter key up exactly, then case-insensitively against quote-stripped row keys.
fn resolve_field_key<'r>(row: &'r Row, lookup: &str) -> Option<&'r Value> {
    if let Some(value) = row.get(lookup) {
        return Some(value);
    }
    let wanted = lookup.to_lowercase();
    row.iter()
        .find(|(key, _)| trim_quotes(key).to_lowercase() == wanted)
        .map(|(_, value)| value)
}

/// Kind-aware equality between a cell and a textual filter value.
pub fn value_matches(value: &Value, expected: &str) -> bool {
    let expected = trim_quotes(expected);
    match value {
        Value::Text(s) => s.trim().to_lowercase() == expected.to_lowercase(),
        Value::Bool(b) => match expected.to_lowercase().as_str() {
            "true" | "1" | "yes" => *b,
            "false" | "0" | "no" => !*b,
            _ => b.to_string() == expected,
        },
        Value::Number(n) => match expected.parse::<f64>() {
            Ok(parsed) => *n == parsed,
            Err(_) => n.to_string() == expected,
        },
        Value::Instant(ts) => match parse_timestamp(expected) {
            Some(parsed) => *ts == parsed,
            None => format_instant(ts).to_lowercase() == expected.to_lowercase(),
        },
        Value::Null => expected.is_empty(),
    }
}
