//! Rule combination
//!
//! Source rules are folded left to right under one operator:
//! `combine([r1, r2, r3], op) = op(op(r1, r2), r3)`. Each source tree is
//! copied out of its arena, so the sources are never modified.

use crate::error::{EngineError, Result};
use rulecraft_core::{Expr, LogicalOperator, Rule, MAX_RULE_NODES};
use std::sync::Arc;

/// Minimum number of rules a combination needs
pub const MIN_COMBINE_RULES: usize = 2;

/// Fold the trees of `rules` under `operator`.
///
/// Fails before building anything when the result would exceed
/// [`MAX_RULE_NODES`].
pub fn combine(rules: &[Arc<Rule>], operator: LogicalOperator) -> Result<Expr> {
    if rules.len() < MIN_COMBINE_RULES {
        return Err(EngineError::Validation(format!(
            "At least {} rules are required to combine, got {}",
            MIN_COMBINE_RULES,
            rules.len()
        )));
    }

    // one joining operator per source after the first
    let nodes = rules
        .iter()
        .fold(rules.len() - 1, |total, r| total.saturating_add(r.len()));
    if nodes > MAX_RULE_NODES {
        return Err(EngineError::Validation(format!(
            "Combined rule would have {} nodes, the limit is {}",
            nodes, MAX_RULE_NODES
        )));
    }

    let mut trees = rules.iter().map(|r| r.to_expr());
    let first = trees
        .next()
        .ok_or_else(|| EngineError::Validation("No rules to combine".to_string()))?;
    Ok(trees.fold(first, |acc, next| Expr::logical(acc, operator, next)))
}
