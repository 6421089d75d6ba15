use std::fmt;
use std::sync::Arc;

use crate::error::SheetError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (the caller sent something unusable).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (transport failures, upstream outages, broken settings).
    Critical,
}

impl Severity {
    /// Classify a failed operation.
    pub fn for_error(error: &SheetError) -> Self {
        match error {
            SheetError::Http(_) | SheetError::InvalidSettings { .. } => Self::Critical,
            SheetError::Upstream { status, .. } if *status >= 500 => Self::Critical,
            SheetError::Upstream { .. } | SheetError::Decode { .. } | SheetError::MissingApiKey => Self::Error,
            SheetError::BadRequest { .. } => Self::Warning,
        }
    }
}

/// Which service operation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ping,
    Sheets,
    Fields,
    Query,
}

/// Context about one service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    pub operation: Operation,
    /// Empty for calls that are not scoped to a sheet.
    pub sheet_id: String,
    /// Host query reference id; empty outside of queries.
    pub ref_id: String,
}

impl OperationContext {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            sheet_id: String::new(),
            ref_id: String::new(),
        }
    }

    pub fn with_sheet(mut self, sheet_id: impl Into<String>) -> Self {
        self.sheet_id = sheet_id.into();
        self
    }

    pub fn with_ref(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = ref_id.into();
        self
    }
}

/// Row counts reported on success.
///
/// `total_rows` is what the upstream returned, `returned_rows` what survived filtering. For
/// listings that are not row-based both count listed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryStats {
    pub total_rows: usize,
    pub returned_rows: usize,
}

impl QueryStats {
    pub fn listed(count: usize) -> Self {
        Self {
            total_rows: count,
            returned_rows: count,
        }
    }
}

/// Observer interface for service outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait QueryObserver: Send + Sync {
    /// Called when an operation succeeds.
    fn on_success(&self, _ctx: &OperationContext, _stats: QueryStats) {}

    /// Called when an operation fails.
    fn on_failure(&self, _ctx: &OperationContext, _severity: Severity, _error: &SheetError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &OperationContext, severity: Severity, error: &SheetError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn QueryObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn QueryObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl QueryObserver for CompositeObserver {
    fn on_success(&self, ctx: &OperationContext, stats: QueryStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &OperationContext, severity: Severity, error: &SheetError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &OperationContext, severity: Severity, error: &SheetError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits service events as `tracing` events.
///
/// Failures are logged at `warn` for [`Severity::Warning`] and at `error` above it; alerts are
/// always logged at `error` with `alert = true`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn on_success(&self, ctx: &OperationContext, stats: QueryStats) {
        tracing::info!(
            operation = ?ctx.operation,
            sheet_id = %ctx.sheet_id,
            ref_id = %ctx.ref_id,
            total_rows = stats.total_rows,
            returned_rows = stats.returned_rows,
            "operation succeeded"
        );
    }

    fn on_failure(&self, ctx: &OperationContext, severity: Severity, error: &SheetError) {
        match severity {
            Severity::Info => tracing::info!(
                operation = ?ctx.operation, sheet_id = %ctx.sheet_id, ref_id = %ctx.ref_id,
                error = %error, "operation failed"
            ),
            Severity::Warning => tracing::warn!(
                operation = ?ctx.operation, sheet_id = %ctx.sheet_id, ref_id = %ctx.ref_id,
                error = %error, "operation failed"
            ),
            Severity::Error | Severity::Critical => tracing::error!(
                operation = ?ctx.operation, sheet_id = %ctx.sheet_id, ref_id = %ctx.ref_id,
                severity = ?severity, error = %error, "operation failed"
            ),
        }
    }

    fn on_alert(&self, ctx: &OperationContext, severity: Severity, error: &SheetError) {
        tracing::error!(
            alert = true,
            operation = ?ctx.operation,
            sheet_id = %ctx.sheet_id,
            ref_id = %ctx.ref_id,
            severity = ?severity,
            error = %error,
            "operation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: u16) -> SheetError {
        SheetError::Upstream {
            method: "GET".to_string(),
            path: "/sheets".to_string(),
            status,
            body: String::new(),
        }
    }

    #[test]
    fn severity_follows_error_class() {
        assert_eq!(Severity::for_error(&upstream(503)), Severity::Critical);
        assert_eq!(Severity::for_error(&upstream(404)), Severity::Error);
        assert_eq!(Severity::for_error(&SheetError::MissingApiKey), Severity::Error);
        assert_eq!(
            Severity::for_error(&SheetError::BadRequest {
                message: "sheetId is required".to_string()
            }),
            Severity::Warning
        );
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn context_builders_fill_scope() {
        let ctx = OperationContext::new(Operation::Query).with_sheet("s1").with_ref("A");
        assert_eq!(ctx.operation, Operation::Query);
        assert_eq!(ctx.sheet_id, "s1");
        assert_eq!(ctx.ref_id, "A");
        assert_eq!(QueryStats::listed(3).returned_rows, 3);
    }
}
