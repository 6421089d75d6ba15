//! Field-kind classification.
//!
//! Classification runs in two stages:
//!
//! 1. [`classify_metadata`] maps declared type/format strings onto a [`FieldKind`].
//! 2. [`refine_with_sample`] inspects up to [`DETECTION_SAMPLE_LIMIT`] non-null values when the
//!    declared kind is [`FieldKind::Text`] or [`FieldKind::Geo`]. Each candidate kind is tested
//!    independently; when several survive, the priority Number > Boolean > Time > Geo decides.

use crate::types::{FieldDescriptor, FieldKind, FieldMetadata, Row, Value};

use super::geo::is_geo_value;
use super::precision::{is_numeric_value, max_fractional_digits};
use super::temporal::parse_timestamp;

/// Maximum number of non-null sample values inspected per column.
pub const DETECTION_SAMPLE_LIMIT: usize = 200;

/// Stage 1: classify from declared metadata alone.
pub fn classify_metadata(meta: &FieldMetadata) -> FieldKind {
    let format = meta.declared_format.trim().to_lowercase();
    let declared = meta.declared_type.trim().to_lowercase();

    if format.contains("true/false") || declared == "boolean" {
        FieldKind::Boolean
    } else if format.contains("number")
        || format.contains("formula")
        || matches!(declared.as_str(), "number" | "integer" | "float" | "double")
    {
        FieldKind::Number
    } else if format.contains("gps")
        || format.contains("location")
        || matches!(declared.as_str(), "gps" | "location")
    {
        FieldKind::Geo
    } else if format.contains("date")
        || format.contains("time")
        || matches!(declared.as_str(), "datetime" | "date")
    {
        FieldKind::Time
    } else {
        FieldKind::Text
    }
}

/// Candidate kinds still consistent with every value seen so far.
#[derive(Debug, Clone, Copy)]
struct Candidates {
    numeric: bool,
    boolean: bool,
    time_like: bool,
    geo_like: bool,
}

impl Candidates {
    fn all() -> Self {
        Self {
            numeric: true,
            boolean: true,
            time_like: true,
            geo_like: true,
        }
    }

    fn observe(&mut self, value: &Value) {
        self.numeric = self.numeric && is_numeric_value(value);
        self.boolean = self.boolean && is_boolean_value(value);
        self.time_like = self.time_like && is_time_value(value);
        self.geo_like = self.geo_like && is_geo_value(value);
    }

    fn exhausted(&self) -> bool {
        !(self.numeric || self.boolean || self.time_like || self.geo_like)
    }

    fn winner(&self) -> Option<FieldKind> {
        if self.numeric {
            Some(FieldKind::Number)
        } else if self.boolean {
            Some(FieldKind::Boolean)
        } else if self.time_like {
            Some(FieldKind::Time)
        } else if self.geo_like {
            Some(FieldKind::Geo)
        } else {
            None
        }
    }
}

/// Stage 2: let sampled values override an ambiguous declared kind.
///
/// Only [`FieldKind::Text`] and [`FieldKind::Geo`] are refined. With no non-null samples, or when
/// no candidate survives, `current` is kept.
pub fn refine_with_sample(key: &str, rows: &[Row], current: FieldKind) -> FieldKind {
    if !matches!(current, FieldKind::Text | FieldKind::Geo) || rows.is_empty() {
        return current;
    }

    let mut candidates = Candidates::all();
    let mut evaluated = 0usize;

    let samples = rows
        .iter()
        .filter_map(|row| row.get(key))
        .filter(|v| !v.is_null())
        .take(DETECTION_SAMPLE_LIMIT);
    for value in samples {
        candidates.observe(value);
        evaluated += 1;
        if candidates.exhausted() {
            break;
        }
    }

    if evaluated == 0 {
        return current;
    }
    candidates.winner().unwrap_or(current)
}

/// Boolean test used by classification: booleans, `true/false/yes/no/1/0` text, and the numbers 0
/// and 1.
pub fn is_boolean_value(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Text(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "1" | "0"
        ),
        Value::Number(n) => *n == 0.0 || *n == 1.0,
        _ => false,
    }
}

/// Time test used by classification.
///
/// Text must contain a date/time separator (`-`, `/`, `:`, `T` or a space) before a parse is even
/// attempted, which keeps bare integers out.
pub fn is_time_value(value: &Value) -> bool {
    match value {
        Value::Instant(_) => true,
        Value::Text(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty()
                && trimmed.contains(['-', '/', ':', 'T', ' '])
                && parse_timestamp(trimmed).is_some()
        }
        _ => false,
    }
}

/// Build one descriptor per declared field, in declaration order.
///
/// Returns an empty list when no metadata is available; callers then fall back to the
/// row-derived field list.
pub fn build_descriptors(fields: &[FieldMetadata], rows: &[Row]) -> Vec<FieldDescriptor> {
    if fields.is_empty() {
        return Vec::new();
    }

    let digits = max_fractional_digits(rows);
    fields
        .iter()
        .map(|meta| {
            let kind = refine_with_sample(&meta.key, rows, classify_metadata(meta));
            let descriptor = FieldDescriptor::new(meta.clone(), kind);
            match digits.get(&meta.key) {
                Some(&d) => descriptor.with_fractional_digits(d),
                None => descriptor,
            }
        })
        .collect()
}
