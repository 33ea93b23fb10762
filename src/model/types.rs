//! Decision model types

use serde::{Deserialize, Serialize};

/// A runtime value flowing through an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, if it is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Short name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            // Integral numbers print without a trailing ".0"
            Value::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(t) => write!(f, "{}", t),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// One node of the structured expression tree
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    /// A constant value
    Literal { value: Value },
    /// Reference to an input, a context entry in scope, or another decision
    Variable { name: String },
    /// Binary arithmetic over two numeric sub-expressions
    Arithmetic {
        op: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Ordered named entries; the context's value is its last entry's value
    Context { entries: Vec<ContextEntry> },
    /// Rule table over one or more input expressions, FIRST hit policy
    DecisionTable {
        inputs: Vec<Expression>,
        rules: Vec<Rule>,
    },
    /// Invocation of a business knowledge model with bound parameters
    Invocation {
        bkm: String,
        #[serde(default)]
        bindings: Vec<Binding>,
    },
}

/// A named entry inside a context expression
#[derive(Debug, Clone, Deserialize)]
pub struct ContextEntry {
    pub name: String,
    pub expression: Expression,
}

/// One decision table rule: a condition per input column and an output
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub when: Vec<Condition>,
    pub then: Value,
}

/// Condition over a single decision table input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Matches any value
    Any,
    /// Exact value match
    Equals(Value),
    /// Number strictly below the bound
    Below(f64),
    /// Number at or above the bound
    AtLeast(f64),
    /// Number in the half-open interval [from, to)
    Range { from: f64, to: f64 },
}

/// Parameter binding for a BKM invocation
#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    pub parameter: String,
    pub expression: Expression,
}

/// Declared model input
#[derive(Debug, Clone, Deserialize)]
pub struct InputData {
    pub name: String,
}

/// A named decision with its body expression
#[derive(Debug, Clone, Deserialize)]
pub struct Decision {
    pub name: String,
    pub expression: Expression,
}

/// A reusable parameterized function invoked from expressions
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessKnowledgeModel {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    pub body: Expression,
}

/// A named subset of decisions evaluated together
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionService {
    pub name: String,
    pub outputs: Vec<String>,
}

/// Root of a decision model
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionModel {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<InputData>,
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub bkms: Vec<BusinessKnowledgeModel>,
    #[serde(default)]
    pub services: Vec<DecisionService>,
}

impl DecisionModel {
    /// Look up a decision by name
    pub fn decision(&self, name: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.name == name)
    }

    /// Look up a business knowledge model by name
    pub fn bkm(&self, name: &str) -> Option<&BusinessKnowledgeModel> {
        self.bkms.iter().find(|b| b.name == name)
    }

    /// Look up a decision service by name
    pub fn service(&self, name: &str) -> Option<&DecisionService> {
        self.services.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_json() {
        assert_eq!(serde_json::from_str::<Value>("null").unwrap(), Value::Null);
        assert_eq!(serde_json::from_str::<Value>("true").unwrap(), Value::Bool(true));
        assert_eq!(serde_json::from_str::<Value>("12").unwrap(), Value::Number(12.0));
        assert_eq!(
            serde_json::from_str::<Value>("\"LOW\"").unwrap(),
            Value::Text("LOW".to_string())
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(12000.0).to_string(), "12000");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Text("HIGH".into()).to_string(), "HIGH");
    }

    #[test]
    fn test_condition_from_json() {
        let c: Condition = serde_json::from_str(r#"{"below": 30000}"#).unwrap();
        assert!(matches!(c, Condition::Below(b) if b == 30000.0));
        let c: Condition = serde_json::from_str(r#""any""#).unwrap();
        assert!(matches!(c, Condition::Any));
        let c: Condition = serde_json::from_str(r#"{"range": {"from": 1, "to": 2}}"#).unwrap();
        assert!(matches!(c, Condition::Range { from, to } if from == 1.0 && to == 2.0));
    }
}
