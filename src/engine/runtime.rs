//! Runtime: model evaluation and listener dispatch

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::model::{Condition, DecisionModel, Expression, Operator, Value};

use super::error::EvalError;
use super::event::{EvaluationEvent, RuntimeEventListener};

/// Caller-supplied input bindings for an evaluation
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    values: BTreeMap<String, Value>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an input value by name
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// The resolved context after an evaluation: inputs plus every decision
/// (and requirement) that was evaluated
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    context: BTreeMap<String, Value>,
}

impl EvaluationResult {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.context.get(name)
    }

    pub fn context(&self) -> &BTreeMap<String, Value> {
        &self.context
    }
}

/// Evaluates a decision model and notifies registered lifecycle listeners
///
/// Listeners are registered once during startup; evaluation itself only
/// needs `&self`, so the runtime can be shared behind an `Arc`.
pub struct DecisionRuntime {
    model: DecisionModel,
    listeners: Vec<Arc<dyn RuntimeEventListener>>,
}

impl DecisionRuntime {
    pub fn new(model: DecisionModel) -> Self {
        Self {
            model,
            listeners: Vec::new(),
        }
    }

    /// Register a lifecycle listener; every listener sees every event
    pub fn add_listener(&mut self, listener: Arc<dyn RuntimeEventListener>) {
        self.listeners.push(listener);
    }

    pub fn model(&self) -> &DecisionModel {
        &self.model
    }

    /// Evaluate every decision in the model against the given context
    pub fn evaluate_all(&self, context: &EvalContext) -> Result<EvaluationResult, EvalError> {
        let mut eval = Evaluator::new(self, context);
        for decision in &self.model.decisions {
            eval.resolve(&decision.name)?;
        }
        Ok(EvaluationResult {
            context: eval.resolved,
        })
    }

    /// Evaluate one decision service's output decisions, wrapped in the
    /// decision-service lifecycle events
    pub fn evaluate_service(
        &self,
        name: &str,
        context: &EvalContext,
    ) -> Result<EvaluationResult, EvalError> {
        let service = self
            .model
            .service(name)
            .ok_or_else(|| EvalError::UnknownService(name.to_string()))?;

        self.fire(name, None, |l, e| l.before_evaluate_decision_service(e));

        let mut eval = Evaluator::new(self, context);
        let mut last = Value::Null;
        for output in &service.outputs {
            last = eval.resolve(output)?;
        }

        self.fire(name, Some(&last), |l, e| l.after_evaluate_decision_service(e));

        Ok(EvaluationResult {
            context: eval.resolved,
        })
    }

    fn fire(
        &self,
        node: &str,
        result: Option<&Value>,
        hook: impl Fn(&dyn RuntimeEventListener, &EvaluationEvent<'_>),
    ) {
        let event = EvaluationEvent { node, result };
        for listener in &self.listeners {
            hook(listener.as_ref(), &event);
        }
    }
}

/// One evaluation pass: memoizes resolved names and tracks the in-progress
/// set for cycle detection
struct Evaluator<'a> {
    runtime: &'a DecisionRuntime,
    resolved: BTreeMap<String, Value>,
    in_progress: HashSet<String>,
}

impl<'a> Evaluator<'a> {
    fn new(runtime: &'a DecisionRuntime, context: &EvalContext) -> Self {
        Self {
            runtime,
            resolved: context.values.clone(),
            in_progress: HashSet::new(),
        }
    }

    /// Resolve a name: an already-known input or memoized decision, or a
    /// decision that still needs evaluating
    fn resolve(&mut self, name: &str) -> Result<Value, EvalError> {
        if let Some(value) = self.resolved.get(name) {
            return Ok(value.clone());
        }

        let runtime = self.runtime;
        let decision = runtime
            .model
            .decision(name)
            .ok_or_else(|| EvalError::UnknownVariable(name.to_string()))?;

        if !self.in_progress.insert(name.to_string()) {
            return Err(EvalError::CyclicDependency(name.to_string()));
        }

        runtime.fire(&decision.name, None, |l, e| l.before_evaluate_decision(e));
        let value = self.eval(&decision.expression, &decision.name, &BTreeMap::new())?;
        runtime.fire(&decision.name, Some(&value), |l, e| l.after_evaluate_decision(e));

        self.in_progress.remove(name);
        self.resolved.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn eval(
        &mut self,
        expr: &Expression,
        node: &str,
        locals: &BTreeMap<String, Value>,
    ) -> Result<Value, EvalError> {
        let runtime = self.runtime;
        match expr {
            Expression::Literal { value } => Ok(value.clone()),

            Expression::Variable { name } => match locals.get(name) {
                Some(value) => Ok(value.clone()),
                None => self.resolve(name),
            },

            Expression::Arithmetic { op, left, right } => {
                let lhs = self.eval(left, node, locals)?;
                let rhs = self.eval(right, node, locals)?;
                apply_operator(*op, &lhs, &rhs, node)
            }

            Expression::Context { entries } => {
                let mut scope = locals.clone();
                let mut last = Value::Null;
                for entry in entries {
                    runtime.fire(&entry.name, None, |l, e| l.before_evaluate_context_entry(e));
                    let value = self.eval(&entry.expression, &entry.name, &scope)?;
                    runtime.fire(&entry.name, Some(&value), |l, e| {
                        l.after_evaluate_context_entry(e)
                    });
                    scope.insert(entry.name.clone(), value.clone());
                    last = value;
                }
                Ok(last)
            }

            Expression::DecisionTable { inputs, rules } => {
                runtime.fire(node, None, |l, e| l.before_evaluate_decision_table(e));

                let mut actual = Vec::with_capacity(inputs.len());
                for input in inputs {
                    actual.push(self.eval(input, node, locals)?);
                }

                // FIRST hit policy: rules are checked in declaration order
                for rule in rules {
                    if rule_matches(rule.when.as_slice(), &actual, node)? {
                        let value = rule.then.clone();
                        runtime.fire(node, Some(&value), |l, e| {
                            l.after_evaluate_decision_table(e)
                        });
                        return Ok(value);
                    }
                }
                Err(EvalError::NoMatchingRule(node.to_string()))
            }

            Expression::Invocation { bkm, bindings } => {
                let def = runtime
                    .model
                    .bkm(bkm)
                    .ok_or_else(|| EvalError::UnknownBkm(bkm.to_string()))?;

                runtime.fire(&def.name, None, |l, e| l.before_evaluate_bkm(e));

                // Parameters form the entire scope of the BKM body
                let mut params = BTreeMap::new();
                for binding in bindings {
                    let value = self.eval(&binding.expression, node, locals)?;
                    params.insert(binding.parameter.clone(), value);
                }

                let value = self.eval(&def.body, &def.name, &params)?;
                runtime.fire(&def.name, Some(&value), |l, e| l.after_evaluate_bkm(e));
                Ok(value)
            }
        }
    }
}

fn apply_operator(op: Operator, lhs: &Value, rhs: &Value, node: &str) -> Result<Value, EvalError> {
    let l = expect_number(lhs, node)?;
    let r = expect_number(rhs, node)?;
    let result = match op {
        Operator::Add => l + r,
        Operator::Subtract => l - r,
        Operator::Multiply => l * r,
        Operator::Divide => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero(node.to_string()));
            }
            l / r
        }
    };
    Ok(Value::Number(result))
}

fn expect_number(value: &Value, node: &str) -> Result<f64, EvalError> {
    value.as_number().ok_or_else(|| EvalError::TypeMismatch {
        node: node.to_string(),
        expected: "number",
        found: value.type_name(),
    })
}

fn rule_matches(conditions: &[Condition], actual: &[Value], node: &str) -> Result<bool, EvalError> {
    for (condition, value) in conditions.iter().zip(actual) {
        let hit = match condition {
            Condition::Any => true,
            Condition::Equals(expected) => expected == value,
            Condition::Below(bound) => expect_number(value, node)? < *bound,
            Condition::AtLeast(bound) => expect_number(value, node)? >= *bound,
            Condition::Range { from, to } => {
                let n = expect_number(value, node)?;
                *from <= n && n < *to
            }
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}
