//! Rulecraft Core - Core types and definitions for the Rulecraft rule engine
//!
//! This crate provides the fundamental types used across the workspace:
//! - Operators and literals of the rule language
//! - The owned expression tree produced by the parser
//! - The per-rule node arena used for storage and node-level edits
//! - Attribute catalog entries and their declared scalar types
//! - Error types

pub mod ast;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use ast::{
    AstNode, Comparison, Condition, Expr, LogicalOperator, Node, NodeId, Rule, RuleId, RuleSummary,
    MAX_RULE_NODES,
};
pub use error::{CoreError, Result};
pub use types::{Attribute, AttributeId, DataType, Literal, Value};
