//! Geo column expansion.
//!
//! Every [`FieldKind::Geo`] column gets two synthesized numeric siblings, `<key>_lat` and
//! `<key>_lon`. Rows whose value does not decode simply lack the siblings.

use std::collections::HashMap;

use crate::inference::decode_geo;
use crate::types::{FieldDescriptor, FieldKind, FieldMetadata, GeoColumnPrecision, Row, Value};

/// Rows with synthesized coordinate cells, plus per-column precision for columns that decoded at
/// least once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoExpansion {
    pub rows: Vec<Row>,
    pub precision: HashMap<String, GeoColumnPrecision>,
}

/// Key of the synthesized latitude column.
pub fn latitude_key(key: &str) -> String {
    format!("{key}_lat")
}

/// Key of the synthesized longitude column.
pub fn longitude_key(key: &str) -> String {
    format!("{key}_lon")
}

/// Inject `<key>_lat` / `<key>_lon` into every row where a geo column decodes.
pub fn expand_geo_rows(rows: &[Row], descriptors: &[FieldDescriptor]) -> GeoExpansion {
    let geo_keys: Vec<&str> = descriptors
        .iter()
        .filter(|d| d.kind == FieldKind::Geo)
        .map(FieldDescriptor::key)
        .collect();
    if geo_keys.is_empty() || rows.is_empty() {
        return GeoExpansion {
            rows: rows.to_vec(),
            precision: HashMap::new(),
        };
    }

    let mut precision: HashMap<String, GeoColumnPrecision> = HashMap::new();
    let rows = rows
        .iter()
        .map(|row| {
            let mut out = row.clone();
            for &key in &geo_keys {
                let Some(point) = row.get(key).and_then(decode_geo) else {
                    continue;
                };
                out.insert(latitude_key(key), Value::Number(point.latitude));
                out.insert(longitude_key(key), Value::Number(point.longitude));
                precision
                    .entry(key.to_string())
                    .or_default()
                    .observe(point.latitude_digits, point.longitude_digits);
            }
            out
        })
        .collect();

    GeoExpansion { rows, precision }
}

/// Insert latitude/longitude descriptors right after each geo descriptor that decoded at least
/// once.
pub fn extend_descriptors_for_geo(
    descriptors: Vec<FieldDescriptor>,
    precision: &HashMap<String, GeoColumnPrecision>,
) -> Vec<FieldDescriptor> {
    let mut out = Vec::with_capacity(descriptors.len() + 2 * precision.len());
    for descriptor in descriptors {
        let observed = (descriptor.kind == FieldKind::Geo)
            .then(|| precision.get(descriptor.key()))
            .flatten()
            .copied();
        let children = observed.map(|info| {
            let label = descriptor.metadata.label_or_key();
            let key = descriptor.key();
            [
                coordinate_descriptor(latitude_key(key), format!("{label} Latitude"), info.latitude_digits),
                coordinate_descriptor(longitude_key(key), format!("{label} Longitude"), info.longitude_digits),
            ]
        });
        out.push(descriptor);
        if let Some(children) = children {
            out.extend(children);
        }
    }
    out
}

fn coordinate_descriptor(key: String, label: String, digits: usize) -> FieldDescriptor {
    let meta = FieldMetadata::new(key, label).with_type("number");
    FieldDescriptor::new(meta, FieldKind::Number).with_fractional_digits(digits)
}
