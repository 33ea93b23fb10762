//! Evaluation errors
//!
//! Every variant is fatal to the demo loop; there is no retry path.

use thiserror::Error;

/// Errors raised while evaluating a decision model
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("unknown variable or decision '{0}'")]
    UnknownVariable(String),

    #[error("unknown business knowledge model '{0}'")]
    UnknownBkm(String),

    #[error("unknown decision service '{0}'")]
    UnknownService(String),

    #[error("cyclic dependency through decision '{0}'")]
    CyclicDependency(String),

    #[error("type mismatch in '{node}': expected {expected}, found {found}")]
    TypeMismatch {
        node: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("division by zero in '{0}'")]
    DivisionByZero(String),

    #[error("no decision table rule matched in '{0}'")]
    NoMatchingRule(String),
}
