//! Field-type inference.
//!
//! Everything in this module is pure: values in, classifications out. Malformed input never
//! produces an error, only a "not this kind" answer.
//!
//! - [`temporal`]: ordered multi-layout timestamp parsing
//! - [`precision`]: numeric detection and displayed fractional digits
//! - [`geo`]: `"lat,lon"` decoding with range validation
//! - [`classify`]: metadata + sample based [`crate::types::FieldKind`] assignment

pub mod classify;
pub mod geo;
pub mod precision;
pub mod temporal;

pub use classify::{build_descriptors, classify_metadata, refine_with_sample, DETECTION_SAMPLE_LIMIT};
pub use geo::{decode_geo, detect_geo_columns, GeoPoint};
pub use precision::{analyze_precision, max_fractional_digits, Precision};
pub use temporal::{parse_timestamp, TimestampLayout, TIMESTAMP_LAYOUTS};
