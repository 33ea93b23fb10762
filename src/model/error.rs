//! Model loading and validation errors

use thiserror::Error;

/// Errors raised while loading or validating a decision model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate definition of '{0}'")]
    DuplicateName(String),

    #[error("service '{service}' outputs unknown decision '{decision}'")]
    UnknownServiceOutput { service: String, decision: String },

    #[error("service '{0}' declares no output decisions")]
    EmptyService(String),

    #[error("decision table in '{node}' has a rule with {found} conditions, expected {expected}")]
    RuleArityMismatch {
        node: String,
        expected: usize,
        found: usize,
    },
}
