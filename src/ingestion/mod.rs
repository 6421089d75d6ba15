//! Everything between the upstream spreadsheet API and the processing pipeline.
//!
//! Most callers should build a [`SheetService`] (from [`service`]) over an [`HttpSheetsApi`]:
//!
//! - [`settings`] resolves the host's instance settings into [`Settings`]
//! - [`client`] fetches sheets, field metadata and rows behind the [`SheetsApi`] trait
//! - [`json`] decodes the upstream `{"data": [...]}` envelopes
//! - [`cache`] keeps field metadata per sheet for a few minutes
//! - [`observability`] reports outcomes to an optional [`QueryObserver`]

pub mod cache;
pub mod client;
pub mod json;
pub mod observability;
pub mod service;
pub mod settings;

pub use cache::{CacheEntry, FieldCache, DEFAULT_FIELD_CACHE_TTL};
pub use client::{sanitize_limit, sanitize_skip, HttpSheetsApi, SheetsApi, MAX_ROWS_PER_REQUEST};
pub use observability::{
    CompositeObserver, Operation, OperationContext, QueryObserver, QueryStats, Severity, TracingObserver,
};
pub use service::{HealthReport, HealthStatus, PingReport, ServiceOptions, SheetService};
pub use settings::{Settings, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
