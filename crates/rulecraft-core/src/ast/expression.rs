//! Owned rule expression tree
//!
//! `Expr` is the shape the parser produces and the combiner and optimizer
//! work on. Storage flattens it into a [`Rule`](super::rule::Rule) arena.

use super::operator::{Comparison, LogicalOperator};
use crate::types::Literal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `attribute comparator literal` test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub attribute: String,
    pub comparison: Comparison,
    pub value: Literal,
}

impl Condition {
    pub fn new(attribute: impl Into<String>, comparison: Comparison, value: impl Into<Literal>) -> Self {
        Self {
            attribute: attribute.into(),
            comparison,
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.comparison, self.value)
    }
}

/// Binary boolean expression over conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical combination of two sub-expressions
    Logical {
        operator: LogicalOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Leaf comparison
    Condition(Condition),
}

impl Expr {
    /// Create a logical expression
    pub fn logical(left: Expr, operator: LogicalOperator, right: Expr) -> Self {
        Expr::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::logical(left, LogicalOperator::And, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::logical(left, LogicalOperator::Or, right)
    }

    /// Create a leaf comparison
    pub fn condition(attribute: impl Into<String>, comparison: Comparison, value: impl Into<Literal>) -> Self {
        Expr::Condition(Condition::new(attribute, comparison, value))
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Logical { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Expr::Condition(_) => 1,
        }
    }

    /// Depth of the tree; a single condition has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Expr::Logical { left, right, .. } => 1 + left.depth().max(right.depth()),
            Expr::Condition(_) => 1,
        }
    }

    /// All conditions, left to right
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Expr::Logical { left, right, .. } => {
                left.collect_conditions(out);
                right.collect_conditions(out);
            }
            Expr::Condition(c) => out.push(c),
        }
    }

    /// Distinct attribute names referenced by the expression, in first-seen order
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for condition in self.conditions() {
            if !names.contains(&condition.attribute.as_str()) {
                names.push(condition.attribute.as_str());
            }
        }
        names
    }

    /// Write a child, adding parentheses wherever the grammar needs them to
    /// rebuild the same tree
    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parent: LogicalOperator, is_right: bool) -> fmt::Result {
        let needs_parens = match self {
            Expr::Logical { operator, .. } => {
                operator.precedence() < parent.precedence()
                    || (is_right && operator.precedence() == parent.precedence())
            }
            Expr::Condition(_) => false,
        };
        if needs_parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    /// Canonical rule text; parsing it yields an identical tree
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Logical { operator, left, right } => {
                left.fmt_child(f, *operator, false)?;
                write!(f, " {} ", operator)?;
                right.fmt_child(f, *operator, true)
            }
            Expr::Condition(c) => write!(f, "{}", c),
        }
    }
}
