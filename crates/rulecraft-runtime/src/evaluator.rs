//! Rule evaluator
//!
//! Walks a rule's node arena from the root. `AND` / `OR` short-circuit:
//! the right branch is skipped once the left branch decides the result, so
//! errors on a skipped branch (missing binding, bad value) are not raised.
//!
//! Each operand is compared in one data type: the catalog's declared type
//! when the attribute is registered, otherwise the type of the literal.
//! Both the bound text and the literal's text are coerced to that type.

use crate::catalog::AttributeCatalog;
use crate::error::{EngineError, Result};
use rulecraft_core::{Condition, CoreError, Node, NodeId, Rule};
use std::collections::HashMap;
use tracing::debug;

/// Attribute name to raw textual value
pub type Bindings = HashMap<String, String>;

/// Evaluator over one catalog
pub struct Evaluator<'a> {
    catalog: &'a AttributeCatalog,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a AttributeCatalog) -> Self {
        Self { catalog }
    }

    /// Evaluate `rule` against `bindings`
    pub fn evaluate(&self, rule: &Rule, bindings: &Bindings) -> Result<bool> {
        let result = self.eval_node(rule, rule.root_id(), bindings)?;
        debug!(rule_id = rule.id, result, "Rule evaluated");
        Ok(result)
    }

    fn eval_node(&self, rule: &Rule, node_id: NodeId, bindings: &Bindings) -> Result<bool> {
        let node = rule.node(node_id).ok_or_else(|| {
            EngineError::Evaluation(format!(
                "Rule {} references missing node {}",
                rule.id, node_id
            ))
        })?;

        match node {
            Node::Operator {
                operator,
                left,
                right,
            } => {
                let left = self.eval_node(rule, *left, bindings)?;
                if left == operator.short_circuits_on() {
                    return Ok(left);
                }
                let right = self.eval_node(rule, *right, bindings)?;
                Ok(operator.apply(left, right))
            }
            Node::Operand(condition) => self.eval_condition(condition, bindings),
        }
    }

    /// Compare one bound value against one literal
    pub fn eval_condition(&self, condition: &Condition, bindings: &Bindings) -> Result<bool> {
        let raw = bindings.get(&condition.attribute).ok_or_else(|| {
            EngineError::Evaluation(format!(
                "Missing value for attribute '{}'",
                condition.attribute
            ))
        })?;

        let data_type = self
            .catalog
            .data_type(&condition.attribute)
            .unwrap_or_else(|| condition.value.data_type());

        let actual = data_type.coerce(raw).map_err(|e| match e {
            CoreError::TypeError(msg) => {
                EngineError::Type(format!("Attribute '{}': {}", condition.attribute, msg))
            }
            other => other.into(),
        })?;
        let expected = data_type.coerce(&condition.value.text()).map_err(|_| {
            EngineError::Type(format!(
                "Literal {} cannot be compared with {} attribute '{}'",
                condition.value, data_type, condition.attribute
            ))
        })?;

        let result = condition.comparison.matches(actual.compare(&expected));
        debug!(
            attribute = %condition.attribute,
            comparison = %condition.comparison,
            actual = %actual,
            expected = %expected,
            result,
            "Condition evaluated"
        );
        Ok(result)
    }
}
