//! `sheet-series` turns loosely-typed spreadsheet API rows into a typed, time-series-ready result
//! set.
//!
//! Cells arrive as text, numbers, booleans or nulls with little or no declared typing. The crate
//! decides a [`types::FieldKind`] for every column, converts each cell accordingly, splits
//! coordinate columns into latitude/longitude pairs, picks a time axis from a loose hint, and
//! applies equality filters plus an inclusive time range.
//!
//! ## Layers
//!
//! - [`inference`]: field-kind classification, fractional precision, timestamp layouts, geo text
//! - [`processing`]: normalization, geo expansion, time-field resolution, filtering, field lists
//! - [`ingestion`]: settings, the upstream API client, field cache, and the [`ingestion::SheetService`]
//! - [`types`]: rows, cell values, field metadata and the host-facing query/response types
//! - [`error`]: errors raised at the network and request boundary
//!
//! The classification core never fails on bad cell data; malformed values degrade to text or
//! null. Only the ingestion layer returns [`SheetError`].
//!
//! ## Quick example: shape rows you already have
//!
//! ```rust
//! use sheet_series::ingestion::json::{decode_fields, decode_rows};
//! use sheet_series::processing::shape_query_result;
//! use sheet_series::types::{Query, Value};
//!
//! let fields = decode_fields(r#"{"data":[{"key":"temp","label":"Temperature"},{"key":"at","label":"At","type":"datetime"}]}"#).unwrap();
//! let rows = decode_rows(r#"{"data":[{"temp":"21.50","at":"2025-09-01 10:00"},{"temp":"19","at":"2025-09-01 11:00"}]}"#).unwrap();
//!
//! let query = Query {
//!     time_field_hint: "AT".to_string(),
//!     ..Default::default()
//! };
//! let shaped = shape_query_result(&query, &fields, &rows);
//!
//! assert_eq!(shaped.time_field.as_deref(), Some("at"));
//! assert_eq!(shaped.rows[1]["temp"], Value::Number(19.0));
//! ```
//!
//! ## Talking to the API
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use sheet_series::ingestion::{HttpSheetsApi, ServiceOptions, Settings, SheetService, TracingObserver};
//! use sheet_series::types::Query;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), sheet_series::SheetError> {
//! let secure = HashMap::from([("apiKey".to_string(), "my-key".to_string())]);
//! let settings = Settings::from_instance("{}", &secure)?;
//! let service = SheetService::with_options(
//!     HttpSheetsApi::new(settings)?,
//!     ServiceOptions {
//!         observer: Some(Arc::new(TracingObserver)),
//!         ..Default::default()
//!     },
//! );
//!
//! let response = service
//!     .query(Query {
//!         sheet_id: "inventory".to_string(),
//!         time_field_hint: "Created".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("rows={} time_field={}", response.rows.len(), response.time_field);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod inference;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{SheetError, SheetResult};
