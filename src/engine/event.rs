//! Evaluation lifecycle events

use crate::model::Value;

/// The five evaluation-lifecycle categories the runtime reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Decision,
    Bkm,
    ContextEntry,
    DecisionTable,
    DecisionService,
}

impl EventKind {
    /// All kinds, in a fixed order
    pub const ALL: [EventKind; 5] = [
        EventKind::Decision,
        EventKind::Bkm,
        EventKind::ContextEntry,
        EventKind::DecisionTable,
        EventKind::DecisionService,
    ];

    /// The label value used for this kind on metric counters
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Decision => "decision",
            EventKind::Bkm => "bkm",
            EventKind::ContextEntry => "context_entry",
            EventKind::DecisionTable => "decision_table",
            EventKind::DecisionService => "decision_service",
        }
    }
}

/// One lifecycle notification
///
/// `result` is `Some` on "after" hooks and `None` on "before" hooks.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationEvent<'a> {
    /// Name of the node being evaluated
    pub node: &'a str,
    /// Evaluation outcome, once known
    pub result: Option<&'a Value>,
}

/// Listener for evaluation lifecycle events
///
/// Ten hooks, before/after for each of the five node kinds. Every hook has
/// a no-op default, so implementations override only what they observe.
/// Listeners are notified in registration order, synchronously, on the
/// evaluating thread.
pub trait RuntimeEventListener: Send + Sync {
    fn before_evaluate_decision(&self, _event: &EvaluationEvent<'_>) {}
    fn after_evaluate_decision(&self, _event: &EvaluationEvent<'_>) {}

    fn before_evaluate_bkm(&self, _event: &EvaluationEvent<'_>) {}
    fn after_evaluate_bkm(&self, _event: &EvaluationEvent<'_>) {}

    fn before_evaluate_context_entry(&self, _event: &EvaluationEvent<'_>) {}
    fn after_evaluate_context_entry(&self, _event: &EvaluationEvent<'_>) {}

    fn before_evaluate_decision_table(&self, _event: &EvaluationEvent<'_>) {}
    fn after_evaluate_decision_table(&self, _event: &EvaluationEvent<'_>) {}

    fn before_evaluate_decision_service(&self, _event: &EvaluationEvent<'_>) {}
    fn after_evaluate_decision_service(&self, _event: &EvaluationEvent<'_>) {}
}
