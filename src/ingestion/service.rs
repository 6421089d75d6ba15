//! Request-handling layer.
//!
//! [`SheetService`] wires a [`SheetsApi`] to the field cache and the processing pipeline. Each
//! public operation mirrors one host endpoint (health, ping, sheets, fields, query).
//!
//! When an observer is configured in [`ServiceOptions`], every operation reports:
//!
//! - `on_success` on success, with row count stats
//! - `on_failure` on failure, with a computed [`Severity`]
//! - `on_alert` on failure when the severity is >= `alert_at_or_above`

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::{SheetError, SheetResult};
use crate::inference::build_descriptors;
use crate::processing::{build_field_infos, shape_query_result};
use crate::types::{FieldInfo, FieldMetadata, Query, QueryResponse, Sheet};

use super::cache::{CacheEntry, DEFAULT_FIELD_CACHE_TTL, FieldCache};
use super::client::{sanitize_limit, sanitize_skip, SheetsApi};
use super::observability::{Operation, OperationContext, QueryObserver, QueryStats, Severity};

/// Options controlling service behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ServiceOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn QueryObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
    /// How long field metadata is reused per sheet.
    pub field_cache_ttl: Duration,
}

impl fmt::Debug for ServiceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("field_cache_ttl", &self.field_cache_ttl)
            .finish()
    }
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: Severity::Critical,
            field_cache_ttl: DEFAULT_FIELD_CACHE_TTL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Outcome of [`SheetService::check_health`]. Failures are carried here, never as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
}

/// Body of a successful ping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PingReport {
    pub status: String,
    pub message: String,
    pub sheet_count: usize,
}

/// One data-source instance: an API client plus its field cache.
pub struct SheetService<A> {
    api: A,
    cache: FieldCache,
    options: ServiceOptions,
}

impl<A> fmt::Debug for SheetService<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetService")
            .field("cached_sheets", &self.cache.len())
            .field("options", &self.options)
            .finish()
    }
}

impl<A: SheetsApi> SheetService<A> {
    pub fn new(api: A) -> Self {
        Self::with_options(api, ServiceOptions::default())
    }

    pub fn with_options(api: A, options: ServiceOptions) -> Self {
        Self {
            api,
            cache: FieldCache::with_ttl(options.field_cache_ttl),
            options,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &FieldCache {
        &self.cache
    }

    /// Validate credentials, then list sheets to prove the key works.
    pub async fn check_health(&self) -> HealthReport {
        let result = match self.api.validate_credentials() {
            Ok(()) => self.api.list_sheets().await.map(|_| ()),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => HealthReport {
                status: HealthStatus::Ok,
                message: "Sheet API backend is running".to_string(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "health check failed");
                HealthReport {
                    status: HealthStatus::Error,
                    message: e.to_string(),
                }
            }
        }
    }

    pub async fn ping(&self) -> SheetResult<PingReport> {
        let ctx = OperationContext::new(Operation::Ping);
        let result = self.list_sheets_checked("ping").await.map(|sheets| PingReport {
            status: "ok".to_string(),
            message: "Connection successful. Data source is ready to use.".to_string(),
            sheet_count: sheets.len(),
        });
        match &result {
            Ok(report) => {
                tracing::info!(sheet_count = report.sheet_count, "ping succeeded");
                self.report_success(&ctx, QueryStats::listed(report.sheet_count));
            }
            Err(e) => self.report_failure(&ctx, e),
        }
        result
    }

    pub async fn sheets(&self) -> SheetResult<Vec<Sheet>> {
        let ctx = OperationContext::new(Operation::Sheets);
        let result = self.list_sheets_checked("sheets").await;
        match &result {
            Ok(sheets) => {
                tracing::info!(count = sheets.len(), "sheets fetched");
                self.report_success(&ctx, QueryStats::listed(sheets.len()));
            }
            Err(e) => self.report_failure(&ctx, e),
        }
        result
    }

    /// Field list of one sheet, classified from metadata alone.
    pub async fn fields(&self, sheet_id: &str) -> SheetResult<Vec<FieldInfo>> {
        let sheet_id = sheet_id.trim();
        let ctx = OperationContext::new(Operation::Fields).with_sheet(sheet_id);
        let result = self.fields_inner(sheet_id).await;
        match &result {
            Ok(infos) => self.report_success(&ctx, QueryStats::listed(infos.len())),
            Err(e) => self.report_failure(&ctx, e),
        }
        result
    }

    /// Fetch, classify, normalize and filter one page of rows.
    pub async fn query(&self, query: Query) -> SheetResult<QueryResponse> {
        let ctx = OperationContext::new(Operation::Query)
            .with_sheet(&query.sheet_id)
            .with_ref(&query.ref_id);
        let result = self.query_inner(query).await;
        match &result {
            Ok((response, total_rows)) => self.report_success(
                &ctx,
                QueryStats {
                    total_rows: *total_rows,
                    returned_rows: response.rows.len(),
                },
            ),
            Err(e) => self.report_failure(&ctx, e),
        }
        result.map(|(response, _)| response)
    }

    async fn list_sheets_checked(&self, operation: &'static str) -> SheetResult<Vec<Sheet>> {
        if let Err(e) = self.api.validate_credentials() {
            tracing::warn!(operation, "missing API key");
            return Err(e);
        }
        self.api.list_sheets().await.inspect_err(|e| {
            tracing::error!(operation, error = %e, "listing sheets failed");
        })
    }

    async fn fields_inner(&self, sheet_id: &str) -> SheetResult<Vec<FieldInfo>> {
        if let Err(e) = self.api.validate_credentials() {
            tracing::warn!(operation = "fields", "missing API key");
            return Err(e);
        }
        if sheet_id.is_empty() {
            return Err(SheetError::BadRequest {
                message: "sheetId is required".to_string(),
            });
        }
        let metadata = self.cached_fields(sheet_id).await.inspect_err(|e| {
            tracing::error!(sheet_id, error = %e, "fields fetch failed");
        })?;
        let descriptors = build_descriptors(&metadata, &[]);
        Ok(build_field_infos(&descriptors, None))
    }

    async fn query_inner(&self, query: Query) -> SheetResult<(QueryResponse, usize)> {
        if let Err(e) = self.api.validate_credentials() {
            tracing::warn!(operation = "query", "missing API key");
            return Err(e);
        }

        if query.sheet_id.trim().is_empty() {
            tracing::debug!(ref_id = %query.ref_id, "query has no sheet id; returning empty result");
            let response = QueryResponse {
                rows: Vec::new(),
                ref_id: query.ref_id,
                sheet_id: String::new(),
                fields: Vec::new(),
                time_field: query.time_field_hint,
            };
            return Ok((response, 0));
        }

        let limit = sanitize_limit(query.limit);
        let skip = sanitize_skip(query.skip);
        tracing::info!(sheet_id = %query.sheet_id, ref_id = %query.ref_id, limit, skip, "query rows");

        let rows = self
            .api
            .list_rows(&query.sheet_id, limit, skip)
            .await
            .inspect_err(|e| tracing::error!(sheet_id = %query.sheet_id, error = %e, "query rows failed"))?;

        let metadata = match self.cached_fields(&query.sheet_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(sheet_id = %query.sheet_id, error = %e, "query failed to fetch field metadata");
                Vec::new()
            }
        };

        let shaped = shape_query_result(&query, &metadata, &rows);
        if !query.time_field_hint.trim().is_empty() && shaped.time_field.is_none() {
            tracing::warn!(
                sheet_id = %query.sheet_id,
                hint = %query.time_field_hint,
                "time field hint did not match any field"
            );
        }
        tracing::info!(
            sheet_id = %query.sheet_id,
            ref_id = %query.ref_id,
            total = shaped.total_rows,
            returned = shaped.rows.len(),
            time_field = shaped.time_field.as_deref().unwrap_or_default(),
            "query rows returned"
        );

        let response = QueryResponse {
            rows: shaped.rows,
            ref_id: query.ref_id,
            sheet_id: query.sheet_id,
            fields: shaped.fields,
            time_field: shaped.time_field.unwrap_or_default(),
        };
        Ok((response, shaped.total_rows))
    }

    /// Field metadata for `sheet_id`, served from the cache while fresh.
    async fn cached_fields(&self, sheet_id: &str) -> SheetResult<Vec<FieldMetadata>> {
        if sheet_id.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(entry) = self.cache.get(sheet_id) {
            return Ok(entry.fields);
        }
        let fields = self.api.list_fields(sheet_id).await?;
        self.cache.put(sheet_id, CacheEntry::new(fields.clone()));
        Ok(fields)
    }

    fn report_success(&self, ctx: &OperationContext, stats: QueryStats) {
        if let Some(obs) = self.options.observer.as_ref() {
            obs.on_success(ctx, stats);
        }
    }

    fn report_failure(&self, ctx: &OperationContext, error: &SheetError) {
        if let Some(obs) = self.options.observer.as_ref() {
            let sev = Severity::for_error(error);
            obs.on_failure(ctx, sev, error);
            if sev >= self.options.alert_at_or_above {
                obs.on_alert(ctx, sev, error);
            }
        }
    }
}
