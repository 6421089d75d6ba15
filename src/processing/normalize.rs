//! Kind-directed value normalization.

use std::collections::HashMap;

use crate::inference::parse_timestamp;
use crate::types::{FieldDescriptor, FieldKind, Row, Value};

/// Returns new rows whose cells are converted according to each column's descriptor.
///
/// Cells without a descriptor pass through unchanged, as do values that do not convert. Source
/// rows are never mutated.
pub fn normalize_rows(rows: &[Row], descriptors: &[FieldDescriptor]) -> Vec<Row> {
    if descriptors.is_empty() || rows.is_empty() {
        return rows.to_vec();
    }

    let kinds: HashMap<&str, FieldKind> = descriptors
        .iter()
        .map(|d| (d.key(), d.kind))
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(key, value)| {
                    let out = match kinds.get(key.as_str()) {
                        Some(&kind) => normalize_value(value, kind),
                        None => value.clone(),
                    };
                    (key.clone(), out)
                })
                .collect()
        })
        .collect()
}

/// Convert one value to the canonical representation of `kind`.
pub fn normalize_value(value: &Value, kind: FieldKind) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    match kind {
        FieldKind::Number => normalize_number(value),
        FieldKind::Boolean => normalize_boolean(value),
        FieldKind::Time => normalize_time(value),
        FieldKind::Text | FieldKind::Geo => value.clone(),
    }
}

fn normalize_number(value: &Value) -> Value {
    match value {
        Value::Text(s) => match s.trim() {
            "" => value.clone(),
            trimmed => trimmed
                .parse::<f64>()
                .map_or_else(|_| value.clone(), Value::Number),
        },
        _ => value.clone(),
    }
}

fn normalize_boolean(value: &Value) -> Value {
    match value {
        Value::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Value::Bool(true),
            "false" | "0" | "no" => Value::Bool(false),
            _ => value.clone(),
        },
        Value::Number(n) => Value::Bool(*n != 0.0),
        _ => value.clone(),
    }
}

fn normalize_time(value: &Value) -> Value {
    match value {
        Value::Text(s) => parse_timestamp(s).map_or_else(|| value.clone(), Value::Instant),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldMetadata;
    use chrono::{TimeZone, Utc};

    fn descriptor(key: &str, kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new(FieldMetadata::new(key, ""), kind)
    }

    fn sample_rows() -> Vec<Row> {
        let mut r1 = Row::new();
        r1.insert("qty".to_string(), Value::text(" 12.50 "));
        r1.insert("ok".to_string(), Value::text("Yes"));
        r1.insert("at".to_string(), Value::text("2025-09-01T10:00:00Z"));
        r1.insert("note".to_string(), Value::text("12"));
        let mut r2 = Row::new();
        r2.insert("qty".to_string(), Value::text("n/a"));
        r2.insert("ok".to_string(), Value::text("maybe"));
        r2.insert("at".to_string(), Value::text("soon"));
        r2.insert("extra".to_string(), Value::Null);
        vec![r1, r2]
    }

    #[test]
    fn converts_by_kind_and_preserves_source_rows() {
        let rows = sample_rows();
        let descriptors = vec![
            descriptor("qty", FieldKind::Number),
            descriptor("ok", FieldKind::Boolean),
            descriptor("at", FieldKind::Time),
            descriptor("note", FieldKind::Text),
        ];

        let out = normalize_rows(&rows, &descriptors);

        assert_eq!(out[0]["qty"], Value::Number(12.5));
        assert_eq!(out[0]["ok"], Value::Bool(true));
        assert_eq!(
            out[0]["at"],
            Value::Instant(Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(out[0]["note"], Value::text("12"));

        // Unconvertible values degrade to the original.
        assert_eq!(out[1]["qty"], Value::text("n/a"));
        assert_eq!(out[1]["ok"], Value::text("maybe"));
        assert_eq!(out[1]["at"], Value::text("soon"));
        assert_eq!(out[1]["extra"], Value::Null);

        // Original unchanged
        assert_eq!(rows[0]["qty"], Value::text(" 12.50 "));
    }

    #[test]
    fn booleans_accept_native_values_and_numbers() {
        assert_eq!(normalize_value(&Value::Bool(false), FieldKind::Boolean), Value::Bool(false));
        assert_eq!(normalize_value(&Value::Number(0.0), FieldKind::Boolean), Value::Bool(false));
        assert_eq!(normalize_value(&Value::Number(2.0), FieldKind::Boolean), Value::Bool(true));
        assert_eq!(normalize_value(&Value::text("NO"), FieldKind::Boolean), Value::Bool(false));
    }

    #[test]
    fn nulls_always_pass_through() {
        for kind in [
            FieldKind::Text,
            FieldKind::Number,
            FieldKind::Boolean,
            FieldKind::Time,
            FieldKind::Geo,
        ] {
            assert_eq!(normalize_value(&Value::Null, kind), Value::Null);
        }
    }

    #[test]
    fn no_descriptors_means_no_conversion() {
        let rows = sample_rows();
        assert_eq!(normalize_rows(&rows, &[]), rows);
    }
}
