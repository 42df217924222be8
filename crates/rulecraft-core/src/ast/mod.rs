//! Abstract Syntax Tree (AST) definitions for Rulecraft
//!
//! This module contains:
//! - Logical and comparison operators
//! - The owned expression tree built by the parser
//! - The arena-backed stored rule and its nested wire shape

pub mod expression;
pub mod operator;
pub mod rule;

pub use expression::{Condition, Expr};
pub use operator::{Comparison, LogicalOperator};
pub use rule::{AstNode, Node, NodeId, Rule, RuleId, RuleSummary, MAX_RULE_NODES};
