//! End-to-end shaping of one query's rows.

use crate::inference::build_descriptors;
use crate::types::{FieldInfo, FieldMetadata, Query, Row};

use super::expand::{expand_geo_rows, extend_descriptors_for_geo};
use super::fields::{build_field_infos, fallback_field_infos};
use super::filter::filter_rows;
use super::normalize::normalize_rows;
use super::time_field::resolve_time_field;

/// Output of [`shape_query_result`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedResult {
    /// Normalized, geo-expanded rows that passed the filters.
    pub rows: Vec<Row>,
    /// Field list, resolved time field first.
    pub fields: Vec<FieldInfo>,
    /// Resolved time-field key, if the hint matched anything.
    pub time_field: Option<String>,
    /// Number of rows before filtering.
    pub total_rows: usize,
}

/// Classify, normalize and filter one batch of fetched rows.
///
/// The time field is resolved against the declared (pre-geo) descriptors and the raw rows. When
/// no metadata is available the field list is derived from the filtered rows instead.
pub fn shape_query_result(query: &Query, fields: &[FieldMetadata], rows: &[Row]) -> ShapedResult {
    let descriptors = build_descriptors(fields, rows);
    let time_field = resolve_time_field(&query.time_field_hint, &descriptors, rows);

    let expansion = expand_geo_rows(rows, &descriptors);
    let descriptors = extend_descriptors_for_geo(descriptors, &expansion.precision);
    let normalized = normalize_rows(&expansion.rows, &descriptors);
    let total_rows = normalized.len();

    let filtered = filter_rows(&normalized, &query.filters, time_field.as_deref(), &query.range);

    let mut infos = build_field_infos(&descriptors, time_field.as_deref());
    if infos.is_empty() {
        infos = fallback_field_infos(&filtered, time_field.as_deref());
    }

    ShapedResult {
        rows: filtered,
        fields: infos,
        time_field,
        total_rows,
    }
}
