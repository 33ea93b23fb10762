//! Declarative decision model
//!
//! The model is authored as JSON and deserialized into a small structured
//! expression tree. There is no textual expression parser; arithmetic,
//! contexts, decision tables and invocations are all explicit nodes.

mod error;
mod loader;
mod types;

pub use error::ModelError;
pub use types::{
    Binding, BusinessKnowledgeModel, Condition, ContextEntry, Decision, DecisionModel,
    DecisionService, Expression, InputData, Operator, Rule, Value,
};
