//! Host-facing field lists.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::inference::{detect_geo_columns, max_fractional_digits, refine_with_sample};
use crate::types::{FieldDescriptor, FieldInfo, FieldKind, Row, SemanticType};

use super::expand::{latitude_key, longitude_key};

/// Render descriptors as [`FieldInfo`]s, moving `time_field` (when present) to index 0.
///
/// The relative order of all other fields is preserved.
pub fn build_field_infos(descriptors: &[FieldDescriptor], time_field: Option<&str>) -> Vec<FieldInfo> {
    let mut fields: Vec<FieldInfo> = descriptors
        .iter()
        .map(|d| FieldInfo {
            key: d.metadata.key.clone(),
            label: d.metadata.label_or_key().to_string(),
            declared_type: d.metadata.declared_type.clone(),
            declared_format: d.metadata.declared_format.clone(),
            semantic_type: d.kind.semantic_type(),
            is_time: d.kind == FieldKind::Time,
            decimals: d.fractional_digits.filter(|&n| n > 0),
        })
        .collect();

    if let Some(time_field) = time_field {
        move_to_front(&mut fields, |f| f.key == time_field);
    }
    fields
}

/// Derive a field list purely from the keys observed in `rows`.
///
/// Keys keep the order of their first appearance (the time field first). Kinds are detected from
/// the rows alone, and every geo column is followed by `<key>_lat` / `<key>_lon` entries.
pub fn fallback_field_infos(rows: &[Row], time_field: Option<&str>) -> Vec<FieldInfo> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut keys: Vec<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect::<IndexSet<&str>>()
        .into_iter()
        .collect();
    if let Some(time_field) = time_field {
        move_to_front(&mut keys, |k| *k == time_field);
    }

    let digits = max_fractional_digits(rows);
    let geo = detect_geo_columns(rows);

    // Real columns always appear; a synthesized child never shadows one.
    let real_keys: HashSet<&str> = keys.iter().copied().collect();
    let mut added: HashSet<String> = HashSet::new();
    let mut fields = Vec::with_capacity(keys.len());
    for key in keys {
        let kind = refine_with_sample(key, rows, FieldKind::Text);
        let decimals = match kind {
            FieldKind::Number => digits.get(key).copied().filter(|&n| n > 0),
            _ => None,
        };
        fields.push(FieldInfo {
            key: key.to_string(),
            label: key.to_string(),
            declared_type: String::new(),
            declared_format: String::new(),
            semantic_type: kind.semantic_type(),
            is_time: Some(key) == time_field || kind == FieldKind::Time,
            decimals,
        });

        if kind != FieldKind::Geo {
            continue;
        }
        let info = geo.get(key).copied().unwrap_or_default();
        let children = [
            (latitude_key(key), format!("{key} Latitude"), info.latitude_digits),
            (longitude_key(key), format!("{key} Longitude"), info.longitude_digits),
        ];
        for (child_key, label, digits) in children {
            if real_keys.contains(child_key.as_str()) || !added.insert(child_key.clone()) {
                continue;
            }
            fields.push(FieldInfo {
                key: child_key,
                label,
                declared_type: String::new(),
                declared_format: String::new(),
                semantic_type: SemanticType::Number,
                is_time: false,
                decimals: (digits > 0).then_some(digits),
            });
        }
    }
    fields
}

fn move_to_front<T>(items: &mut [T], pred: impl Fn(&T) -> bool) {
    if let Some(idx) = items.iter().position(pred) {
        items[..=idx].rotate_right(1);
    }
}
