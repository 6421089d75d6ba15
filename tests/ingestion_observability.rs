mod common;

use std::sync::{Arc, Mutex};

use common::FakeApi;
use sheet_series::ingestion::{
    CompositeObserver, Operation, OperationContext, QueryObserver, QueryStats, ServiceOptions, Severity,
    SheetService, TracingObserver,
};
use sheet_series::types::{Filter, Query};
use sheet_series::SheetError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Operation, QueryStats)>>,
    failures: Mutex<Vec<Severity>>,
    alerts: Mutex<Vec<Severity>>,
}

impl QueryObserver for RecordingObserver {
    fn on_success(&self, ctx: &OperationContext, stats: QueryStats) {
        self.successes.lock().unwrap().push((ctx.operation, stats));
    }

    fn on_failure(&self, _ctx: &OperationContext, severity: Severity, _error: &SheetError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &OperationContext, severity: Severity, _error: &SheetError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn service_with(api: FakeApi, obs: Arc<RecordingObserver>, threshold: Severity) -> SheetService<FakeApi> {
    SheetService::with_options(
        api,
        ServiceOptions {
            observer: Some(obs),
            alert_at_or_above: threshold,
            ..Default::default()
        },
    )
}

fn query(sheet_id: &str) -> Query {
    Query {
        ref_id: "A".to_string(),
        sheet_id: sheet_id.to_string(),
        filters: vec![Filter::new("name", "gadget")],
        ..Default::default()
    }
}

#[tokio::test]
async fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let svc = service_with(FakeApi::inventory(), obs.clone(), Severity::Critical);

    svc.query(query("inventory")).await.unwrap();
    svc.ping().await.unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![
            (
                Operation::Query,
                QueryStats {
                    total_rows: 4,
                    returned_rows: 1
                }
            ),
            (Operation::Ping, QueryStats::listed(2)),
        ]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[tokio::test]
async fn observer_receives_failure_and_alert_on_upstream_outage() {
    let obs = Arc::new(RecordingObserver::default());
    let mut api = FakeApi::inventory();
    api.rows_status = Some(503);
    let svc = service_with(api, obs.clone(), Severity::Critical);

    let _ = svc.query(query("inventory")).await.unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![Severity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![Severity::Critical]);
}

#[tokio::test]
async fn observer_does_not_alert_below_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let mut api = FakeApi::inventory();
    api.rows_status = Some(404);
    let svc = service_with(api, obs.clone(), Severity::Critical);

    let _ = svc.query(query("inventory")).await.unwrap_err();
    let _ = svc.fields("").await.unwrap_err();

    assert_eq!(
        obs.failures.lock().unwrap().clone(),
        vec![Severity::Error, Severity::Warning]
    );
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn lower_threshold_alerts_on_missing_key() {
    let obs = Arc::new(RecordingObserver::default());
    let mut api = FakeApi::inventory();
    api.has_key = false;
    let svc = service_with(api, obs.clone(), Severity::Error);

    let _ = svc.sheets().await.unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![Severity::Error]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![Severity::Error]);
}

#[tokio::test]
async fn field_metadata_failure_is_not_an_operation_failure() {
    let obs = Arc::new(RecordingObserver::default());
    let mut api = FakeApi::inventory();
    api.fields_status = Some(500);
    let svc = service_with(api, obs.clone(), Severity::Info);

    svc.query(query("inventory")).await.unwrap();

    assert!(obs.failures.lock().unwrap().is_empty());
    assert!(obs.alerts.lock().unwrap().is_empty());
    assert_eq!(obs.successes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn composite_observer_fans_out() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn QueryObserver>> = vec![a.clone(), b.clone(), Arc::new(TracingObserver)];
    let composite = CompositeObserver::new(observers);
    let mut api = FakeApi::inventory();
    api.rows_status = Some(502);
    let svc = SheetService::with_options(
        api,
        ServiceOptions {
            observer: Some(Arc::new(composite)),
            ..Default::default()
        },
    );

    let _ = svc.query(query("inventory")).await.unwrap_err();

    for obs in [&a, &b] {
        assert_eq!(obs.failures.lock().unwrap().clone(), vec![Severity::Critical]);
        assert_eq!(obs.alerts.lock().unwrap().clone(), vec![Severity::Critical]);
    }
}
