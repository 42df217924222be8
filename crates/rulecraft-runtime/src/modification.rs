//! Node-level rule edits
//!
//! A [`NodeModification`] targets one node of a rule's tree by id. Operator
//! nodes accept `new_operator`; operand nodes accept any combination of
//! `new_attribute`, `new_comparison` and `new_value`. Fields for the other
//! node kind are rejected rather than ignored.

use crate::catalog::AttributeCatalog;
use crate::error::{EngineError, Result};
use rulecraft_core::{Comparison, Literal, LogicalOperator, Node, NodeId, Rule};
use rulecraft_parser::is_identifier;
use serde::{Deserialize, Serialize};

/// Requested change to a single node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeModification {
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_comparison: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Literal>,
}

impl NodeModification {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            ..Self::default()
        }
    }

    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.new_operator = Some(operator.into());
        self
    }

    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.new_attribute = Some(attribute.into());
        self
    }

    pub fn comparison(mut self, comparison: impl Into<String>) -> Self {
        self.new_comparison = Some(comparison.into());
        self
    }

    pub fn value(mut self, value: impl Into<Literal>) -> Self {
        self.new_value = Some(value.into());
        self
    }

    fn has_operand_fields(&self) -> bool {
        self.new_attribute.is_some() || self.new_comparison.is_some() || self.new_value.is_some()
    }

    fn is_empty(&self) -> bool {
        self.new_operator.is_none() && !self.has_operand_fields()
    }

    /// Apply the change to `rule`.
    ///
    /// Every field is validated before the node is touched, so on error the
    /// rule is unchanged. When `strict` is set a new attribute must already
    /// be in `catalog`.
    pub fn apply(&self, rule: &mut Rule, catalog: &AttributeCatalog, strict: bool) -> Result<()> {
        if self.is_empty() {
            return Err(EngineError::Validation(
                "Modification must change at least one field".to_string(),
            ));
        }

        let rule_id = rule.id;
        let node = rule.node_mut(self.node_id).ok_or_else(|| {
            EngineError::NotFound(format!("node {} in rule {}", self.node_id, rule_id))
        })?;

        match node {
            Node::Operator { operator, .. } => {
                if self.has_operand_fields() {
                    return Err(EngineError::Validation(format!(
                        "Node {} is an operator node; only new_operator applies",
                        self.node_id
                    )));
                }
                if let Some(text) = &self.new_operator {
                    *operator = parse_operator(text)?;
                }
            }
            Node::Operand(condition) => {
                if self.new_operator.is_some() {
                    return Err(EngineError::Validation(format!(
                        "Node {} is an operand node; new_operator does not apply",
                        self.node_id
                    )));
                }

                let attribute = match &self.new_attribute {
                    Some(name) => Some(validate_attribute(name, catalog, strict)?),
                    None => None,
                };
                let comparison = match &self.new_comparison {
                    Some(text) => Some(parse_comparison(text)?),
                    None => None,
                };

                if let Some(attribute) = attribute {
                    condition.attribute = attribute;
                }
                if let Some(comparison) = comparison {
                    condition.comparison = comparison;
                }
                if let Some(value) = &self.new_value {
                    condition.value = value.clone();
                }
            }
        }

        rule.touch();
        Ok(())
    }
}

fn parse_operator(text: &str) -> Result<LogicalOperator> {
    Ok(text.parse::<LogicalOperator>()?)
}

fn parse_comparison(text: &str) -> Result<Comparison> {
    Ok(text.parse::<Comparison>()?)
}

fn validate_attribute(name: &str, catalog: &AttributeCatalog, strict: bool) -> Result<String> {
    let name = name.trim();
    if !is_identifier(name) {
        return Err(EngineError::Validation(format!(
            "Attribute name '{}' is not a valid identifier",
            name
        )));
    }
    if strict {
        catalog.require_all([name])?;
    }
    Ok(name.to_string())
}
