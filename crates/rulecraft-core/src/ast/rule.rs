//! Stored rule representation
//!
//! A `Rule` owns its tree as an arena: a `Vec<Node>` laid out in pre-order,
//! where a node's id is its index plus one. Children are referenced by id, so
//! a node can be looked up and edited in place without walking the tree, and
//! ids stay stable across reads, edits and restarts.

use super::expression::{Condition, Expr};
use super::operator::{Comparison, LogicalOperator};
use crate::types::Literal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned rule identifier
pub type RuleId = u32;

/// Node identifier, unique within one rule
pub type NodeId = u32;

/// Most nodes a single rule tree may hold
pub const MAX_RULE_NODES: usize = 1024;

/// Arena node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Operator {
        operator: LogicalOperator,
        left: NodeId,
        right: NodeId,
    },
    Operand(Condition),
}

impl Node {
    pub fn is_operator(&self) -> bool {
        matches!(self, Node::Operator { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Operator { .. } => "operator",
            Node::Operand(_) => "operand",
        }
    }
}

/// Stored rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    /// Source text, or the canonical rendering for combined and edited rules
    pub rule_string: String,
    nodes: Vec<Node>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// Build a rule from an expression, numbering nodes 1.. in pre-order
    pub fn new(id: RuleId, name: impl Into<String>, expr: &Expr, rule_string: impl Into<String>) -> Self {
        let mut nodes = Vec::with_capacity(expr.node_count());
        flatten(expr, &mut nodes);
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            rule_string: rule_string.into(),
            nodes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Id of the root node; always the first node in pre-order
    pub fn root_id(&self) -> NodeId {
        1
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        let index = (node_id as usize).checked_sub(1)?;
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        let index = (node_id as usize).checked_sub(1)?;
        self.nodes.get_mut(index)
    }

    /// Iterate nodes with their ids, in pre-order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| ((i + 1) as NodeId, node))
    }

    /// Rebuild the owned expression tree
    pub fn to_expr(&self) -> Expr {
        self.expr_at(self.root_id())
    }

    fn expr_at(&self, node_id: NodeId) -> Expr {
        match &self.nodes[(node_id - 1) as usize] {
            Node::Operator { operator, left, right } => {
                Expr::logical(self.expr_at(*left), *operator, self.expr_at(*right))
            }
            Node::Operand(condition) => Expr::Condition(condition.clone()),
        }
    }

    /// Nested tree with node ids, as returned to API clients
    pub fn to_tree(&self) -> AstNode {
        self.tree_at(self.root_id())
    }

    fn tree_at(&self, node_id: NodeId) -> AstNode {
        match &self.nodes[(node_id - 1) as usize] {
            Node::Operator { operator, left, right } => AstNode::Operator {
                node_id,
                operator: *operator,
                left: Box::new(self.tree_at(*left)),
                right: Box::new(self.tree_at(*right)),
            },
            Node::Operand(condition) => AstNode::Operand {
                node_id,
                attribute: condition.attribute.clone(),
                comparison: condition.comparison,
                value: condition.value.clone(),
            },
        }
    }

    /// Re-render `rule_string` from the current tree and bump `updated_at`
    pub fn touch(&mut self) {
        self.rule_string = self.to_expr().to_string();
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Check arena invariants: between one and [`MAX_RULE_NODES`] nodes,
    /// every operator has two children that come after it in pre-order, and
    /// every node except the root is referenced exactly once.
    ///
    /// Only data loaded from outside can violate these.
    pub fn is_well_formed(&self) -> bool {
        if self.nodes.is_empty() || self.nodes.len() > MAX_RULE_NODES {
            return false;
        }
        let len = self.nodes.len() as NodeId;
        let mut references = vec![0u32; self.nodes.len()];
        for (id, node) in self.nodes() {
            if let Node::Operator { left, right, .. } = node {
                for child in [*left, *right] {
                    if child <= id || child > len {
                        return false;
                    }
                    references[(child - 1) as usize] += 1;
                }
            }
        }
        references[0] == 0 && references[1..].iter().all(|&count| count == 1)
    }
}

fn flatten(expr: &Expr, nodes: &mut Vec<Node>) -> NodeId {
    let id = nodes.len() as NodeId + 1;
    match expr {
        Expr::Condition(condition) => nodes.push(Node::Operand(condition.clone())),
        Expr::Logical { operator, left, right } => {
            // Placeholder keeps pre-order numbering; children are patched in below
            nodes.push(Node::Operator {
                operator: *operator,
                left: 0,
                right: 0,
            });
            let left_id = flatten(left, nodes);
            let right_id = flatten(right, nodes);
            nodes[(id - 1) as usize] = Node::Operator {
                operator: *operator,
                left: left_id,
                right: right_id,
            };
        }
    }
    id
}

/// `{id, name}` listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub id: RuleId,
    pub name: String,
}

/// Nested AST as exchanged over the wire.
///
/// Operator nodes carry `operator`, `left` and `right`; operand nodes carry
/// `attribute`, `comparison` and `value`. The presence of `operator` tells
/// the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AstNode {
    Operator {
        node_id: NodeId,
        operator: LogicalOperator,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    Operand {
        node_id: NodeId,
        attribute: String,
        comparison: Comparison,
        value: Literal,
    },
}

impl AstNode {
    pub fn node_id(&self) -> NodeId {
        match self {
            AstNode::Operator { node_id, .. } | AstNode::Operand { node_id, .. } => *node_id,
        }
    }
}
