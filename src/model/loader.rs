//! Model loading and validation

use std::collections::HashSet;
use std::path::Path;

use super::error::ModelError;
use super::types::{DecisionModel, Expression};

/// The model shipped with the demo, equivalent to the original
/// simple-item-def: Yearly Salary = Monthly Salary * 12, plus a salary
/// band decision table.
const BUNDLED_MODEL: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/models/simple-item-def.json"));

impl DecisionModel {
    /// Parse and validate a model from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: DecisionModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The bundled demo model
    pub fn bundled() -> Result<Self, ModelError> {
        Self::from_json(BUNDLED_MODEL)
    }

    /// Structural validation: unique names, resolvable service outputs,
    /// rule arity per decision table
    fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for name in self
            .inputs
            .iter()
            .map(|i| i.name.as_str())
            .chain(self.decisions.iter().map(|d| d.name.as_str()))
            .chain(self.bkms.iter().map(|b| b.name.as_str()))
            .chain(self.services.iter().map(|s| s.name.as_str()))
        {
            if !seen.insert(name) {
                return Err(ModelError::DuplicateName(name.to_string()));
            }
        }

        for service in &self.services {
            if service.outputs.is_empty() {
                return Err(ModelError::EmptyService(service.name.clone()));
            }
            for output in &service.outputs {
                if self.decision(output).is_none() {
                    return Err(ModelError::UnknownServiceOutput {
                        service: service.name.clone(),
                        decision: output.clone(),
                    });
                }
            }
        }

        for decision in &self.decisions {
            validate_expression(&decision.expression, &decision.name)?;
        }
        for bkm in &self.bkms {
            validate_expression(&bkm.body, &bkm.name)?;
        }

        Ok(())
    }
}

fn validate_expression(expr: &Expression, node: &str) -> Result<(), ModelError> {
    match expr {
        Expression::Literal { .. } | Expression::Variable { .. } => Ok(()),
        Expression::Arithmetic { left, right, .. } => {
            validate_expression(left, node)?;
            validate_expression(right, node)
        }
        Expression::Context { entries } => {
            for entry in entries {
                validate_expression(&entry.expression, &entry.name)?;
            }
            Ok(())
        }
        Expression::DecisionTable { inputs, rules } => {
            for input in inputs {
                validate_expression(input, node)?;
            }
            for rule in rules {
                if rule.when.len() != inputs.len() {
                    return Err(ModelError::RuleArityMismatch {
                        node: node.to_string(),
                        expected: inputs.len(),
                        found: rule.when.len(),
                    });
                }
            }
            Ok(())
        }
        Expression::Invocation { bindings, .. } => {
            for binding in bindings {
                validate_expression(&binding.expression, node)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_model_parses() {
        let model = DecisionModel::bundled().unwrap();
        assert_eq!(model.name, "simple-item-def");
        assert!(model.decision("Yearly Salary").is_some());
        assert!(model.decision("Salary Band").is_some());
        assert!(model.service("Salary Service").is_some());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let json = r#"{
            "name": "dup",
            "decisions": [
                {"name": "A", "expression": {"kind": "literal", "value": 1}},
                {"name": "A", "expression": {"kind": "literal", "value": 2}}
            ]
        }"#;
        assert!(matches!(
            DecisionModel::from_json(json),
            Err(ModelError::DuplicateName(name)) if name == "A"
        ));
    }

    #[test]
    fn test_service_with_unknown_output_rejected() {
        let json = r#"{
            "name": "bad-service",
            "decisions": [
                {"name": "A", "expression": {"kind": "literal", "value": 1}}
            ],
            "services": [{"name": "S", "outputs": ["Missing"]}]
        }"#;
        assert!(matches!(
            DecisionModel::from_json(json),
            Err(ModelError::UnknownServiceOutput { .. })
        ));
    }

    #[test]
    fn test_rule_arity_mismatch_rejected() {
        let json = r#"{
            "name": "bad-table",
            "decisions": [{
                "name": "T",
                "expression": {
                    "kind": "decision_table",
                    "inputs": [{"kind": "variable", "name": "x"}],
                    "rules": [{"when": ["any", "any"], "then": 1}]
                }
            }]
        }"#;
        assert!(matches!(
            DecisionModel::from_json(json),
            Err(ModelError::RuleArityMismatch { expected: 1, found: 2, .. })
        ));
    }
}
