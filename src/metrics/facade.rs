//! Metrics-facade listener
//!
//! Counters go through the `metrics` facade; the installed
//! `metrics-exporter-prometheus` recorder renders them for scrapes. The
//! five counter handles are pre-registered at construction, so every event
//! kind renders as 0 before its first event.

use metrics::{counter, describe_counter, Counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::engine::{EvaluationEvent, EventKind, RuntimeEventListener};

const COUNTER_NAME: &str = "dmn_evaluation_facade_total";

/// Global recorder handle, kept so the scrape endpoint can render
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Errors that can occur during metrics setup
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to install metrics recorder: {0}")]
    SetupFailed(String),
}

/// Install the facade recorder and return its render handle
///
/// Idempotent: a second call returns the handle installed by the first.
pub fn install_facade_recorder() -> Result<&'static PrometheusHandle, MetricsError> {
    PROMETHEUS_HANDLE.get_or_try_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| MetricsError::SetupFailed(e.to_string()))
    })
}

/// Lifecycle listener backed by the `metrics` facade
///
/// Holds one counter handle per event kind, resolved against whichever
/// recorder is current when the listener is constructed.
pub struct MetricsFacadeListener {
    decision: Counter,
    bkm: Counter,
    context_entry: Counter,
    decision_table: Counter,
    decision_service: Counter,
}

impl MetricsFacadeListener {
    pub fn new() -> Self {
        describe_counter!(
            COUNTER_NAME,
            "DMN evaluations observed by the metrics facade backend"
        );
        Self {
            decision: counter!(COUNTER_NAME, "type" => EventKind::Decision.label()),
            bkm: counter!(COUNTER_NAME, "type" => EventKind::Bkm.label()),
            context_entry: counter!(COUNTER_NAME, "type" => EventKind::ContextEntry.label()),
            decision_table: counter!(COUNTER_NAME, "type" => EventKind::DecisionTable.label()),
            decision_service: counter!(COUNTER_NAME, "type" => EventKind::DecisionService.label()),
        }
    }
}

impl Default for MetricsFacadeListener {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeEventListener for MetricsFacadeListener {
    fn after_evaluate_decision(&self, _event: &EvaluationEvent<'_>) {
        self.decision.increment(1);
    }

    fn after_evaluate_bkm(&self, _event: &EvaluationEvent<'_>) {
        self.bkm.increment(1);
    }

    fn after_evaluate_context_entry(&self, _event: &EvaluationEvent<'_>) {
        self.context_entry.increment(1);
    }

    fn after_evaluate_decision_table(&self, _event: &EvaluationEvent<'_>) {
        self.decision_table.increment(1);
    }

    fn after_evaluate_decision_service(&self, _event: &EvaluationEvent<'_>) {
        self.decision_service.increment(1);
    }
}
