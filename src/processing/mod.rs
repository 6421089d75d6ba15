//! Row transformations and response shaping.
//!
//! The processing layer operates on [`crate::types::Row`]s produced by ingestion and on the
//! [`crate::types::FieldDescriptor`]s produced by [`crate::inference`]. Every function here is
//! synchronous and returns new rows; inputs are never mutated.
//!
//! Currently implemented:
//!
//! - [`normalize_rows()`]: kind-directed value conversion
//! - [`expand_geo_rows()`] / [`extend_descriptors_for_geo()`]: latitude/longitude synthesis
//! - [`resolve_time_field()`]: time-axis selection from a loose hint
//! - [`filter_rows()`]: equality filters and inclusive time range
//! - [`build_field_infos()`] / [`fallback_field_infos()`]: host-facing field lists
//! - [`shape_query_result()`]: all of the above, in order
//!
//! ## Example
//!
//! ```rust
//! use sheet_series::processing::shape_query_result;
//! use sheet_series::types::{FieldMetadata, Filter, Query, Row, Value};
//!
//! let fields = vec![
//!     FieldMetadata::new("qty", "Quantity").with_format("number"),
//!     FieldMetadata::new("at", "Created").with_type("datetime"),
//! ];
//! let mut row = Row::new();
//! row.insert("qty".to_string(), Value::text("12.50"));
//! row.insert("at".to_string(), Value::text("2025-09-01 10:00"));
//!
//! let query = Query {
//!     time_field_hint: "created".to_string(),
//!     filters: vec![Filter::new("qty", "12.5")],
//!     ..Default::default()
//! };
//! let shaped = shape_query_result(&query, &fields, &[row]);
//!
//! assert_eq!(shaped.time_field.as_deref(), Some("at"));
//! assert_eq!(shaped.fields[0].key, "at");
//! assert_eq!(shaped.fields[1].decimals, Some(2));
//! assert_eq!(shaped.rows[0]["qty"], Value::Number(12.5));
//! ```

pub mod expand;
pub mod fields;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod time_field;

pub use expand::{expand_geo_rows, extend_descriptors_for_geo, GeoExpansion};
pub use fields::{build_field_infos, fallback_field_infos};
pub use filter::{filter_rows, trim_quotes, value_matches, TimeBounds};
pub use normalize::{normalize_rows, normalize_value};
pub use pipeline::{shape_query_result, ShapedResult};
pub use time_field::resolve_time_field;
