//! Time-axis resolution.

use crate::types::{FieldDescriptor, Row};

/// Map a caller's time-field hint onto a canonical column key.
///
/// Tried in order, all case-insensitively: descriptor keys, descriptor labels, then every raw row
/// key (covers columns the metadata does not declare). An empty hint resolves to `None`.
pub fn resolve_time_field(hint: &str, descriptors: &[FieldDescriptor], rows: &[Row]) -> Option<String> {
    let hint = hint.trim();
    if hint.is_empty() {
        return None;
    }
    let wanted = hint.to_lowercase();

    if let Some(d) = descriptors.iter().find(|d| d.key().to_lowercase() == wanted) {
        return Some(d.key().to_string());
    }

    if let Some(d) = descriptors
        .iter()
        .find(|d| !d.metadata.label.is_empty() && d.metadata.label.to_lowercase() == wanted)
    {
        return Some(d.key().to_string());
    }

    rows.iter()
        .flat_map(|row| row.keys())
        .find(|key| key.to_lowercase() == wanted)
        .cloned()
}
