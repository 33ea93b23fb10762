//! Decision evaluation runtime
//!
//! Evaluates a [`crate::model::DecisionModel`] against a caller-supplied
//! context and notifies registered listeners of every evaluation lifecycle
//! event (before/after, for five node kinds).

mod error;
mod event;
mod runtime;

pub use error::EvalError;
pub use event::{EvaluationEvent, EventKind, RuntimeEventListener};
pub use runtime::{DecisionRuntime, EvalContext, EvaluationResult};
