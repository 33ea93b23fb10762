//! Direct prometheus-client listener
//!
//! One `IntCounterVec` labelled by event kind, registered in an owned
//! registry so this backend shares nothing with the facade backend.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::engine::{EvaluationEvent, EventKind, RuntimeEventListener};

/// Lifecycle listener backed by the `prometheus` client crate
pub struct PrometheusClientListener {
    registry: Registry,
    evaluations: IntCounterVec,
}

impl PrometheusClientListener {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let evaluations = IntCounterVec::new(
            Opts::new(
                "dmn_evaluation_client_total",
                "DMN evaluations observed by the prometheus client backend",
            ),
            &["type"],
        )?;
        registry.register(Box::new(evaluations.clone()))?;
        Ok(Self {
            registry,
            evaluations,
        })
    }

    /// Render the current counters in the Prometheus text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Current count for one event kind
    pub fn count(&self, kind: EventKind) -> u64 {
        self.evaluations.with_label_values(&[kind.label()]).get()
    }

    fn increment(&self, kind: EventKind) {
        self.evaluations.with_label_values(&[kind.label()]).inc();
    }
}

impl RuntimeEventListener for PrometheusClientListener {
    fn after_evaluate_decision(&self, _event: &EvaluationEvent<'_>) {
        self.increment(EventKind::Decision);
    }

    fn after_evaluate_bkm(&self, _event: &EvaluationEvent<'_>) {
        self.increment(EventKind::Bkm);
    }

    fn after_evaluate_context_entry(&self, _event: &EvaluationEvent<'_>) {
        self.increment(EventKind::ContextEntry);
    }

    fn after_evaluate_decision_table(&self, _event: &EvaluationEvent<'_>) {
        self.increment(EventKind::DecisionTable);
    }

    fn after_evaluate_decision_service(&self, _event: &EvaluationEvent<'_>) {
        self.increment(EventKind::DecisionService);
    }
}
