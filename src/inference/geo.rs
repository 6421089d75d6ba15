//! Composite `"lat,lon"` coordinate decoding.

use std::collections::HashMap;

use crate::types::{GeoColumnPrecision, Row, Value};

use super::precision::component_digits;

/// A decoded coordinate pair and the fractional digits each component displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_digits: usize,
    pub longitude_digits: usize,
}

/// Decode a `"lat,lon"` value.
///
/// `;` and `", "` are normalized to `,`, then the text is split on `,` or `|`. Exactly two
/// non-empty tokens must remain, both must parse as finite floats, and `|lat| <= 90`,
/// `|lon| <= 180`. Non-text values are decoded from their display form.
pub fn decode_geo(value: &Value) -> Option<GeoPoint> {
    let raw = match value {
        Value::Text(s) => s.clone(),
        Value::Null => return None,
        other => other.display_string(),
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = raw.replace(';', ",").replace(", ", ",");
    let mut tokens = normalized
        .split([',', '|'])
        .filter(|token| !token.is_empty());
    let (lat_token, lon_token) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(lat), Some(lon), None) => (lat.trim(), lon.trim()),
        _ => return None,
    };

    let latitude = lat_token.parse::<f64>().ok()?;
    let longitude = lon_token.parse::<f64>().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
        return None;
    }

    Some(GeoPoint {
        latitude,
        longitude,
        latitude_digits: component_digits(lat_token),
        longitude_digits: component_digits(lon_token),
    })
}

/// Whether `value` decodes as a coordinate pair.
pub fn is_geo_value(value: &Value) -> bool {
    decode_geo(value).is_some()
}

/// Scan every cell of every row and collect per-key coordinate precision for cells that decode.
///
/// Used by the fallback field list, where no descriptors exist to say which columns are geo.
pub fn detect_geo_columns(rows: &[Row]) -> HashMap<String, GeoColumnPrecision> {
    let mut out: HashMap<String, GeoColumnPrecision> = HashMap::new();
    for row in rows {
        for (key, value) in row {
            if let Some(point) = decode_geo(value) {
                out.entry(key.clone())
                    .or_default()
                    .observe(point.latitude_digits, point.longitude_digits);
            }
        }
    }
    out
}
