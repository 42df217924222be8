//! Structural simplification of combined rules
//!
//! Applied bottom-up:
//! - `X op X` collapses to `X`
//! - two bounds on the same side of the same numeric attribute merge:
//!   `AND` keeps the tighter one, `OR` the looser one
//!
//! The result evaluates to the same boolean as the input for every set of
//! bindings.

use crate::catalog::AttributeCatalog;
use rulecraft_core::{Condition, Expr, LogicalOperator};
use std::cmp::Ordering;

/// Simplify `expr`, using `catalog` to decide which attributes are numeric
pub fn simplify(expr: Expr, catalog: &AttributeCatalog) -> Expr {
    match expr {
        Expr::Condition(_) => expr,
        Expr::Logical {
            operator,
            left,
            right,
        } => {
            let left = simplify(*left, catalog);
            let right = simplify(*right, catalog);

            if left == right {
                return left;
            }

            if let (Expr::Condition(l), Expr::Condition(r)) = (&left, &right) {
                if let Some(merged) = merge_bounds(l, r, operator, catalog) {
                    return Expr::Condition(merged);
                }
            }

            Expr::logical(left, operator, right)
        }
    }
}

/// Merge two same-side bounds on one numeric attribute, if possible
fn merge_bounds(
    left: &Condition,
    right: &Condition,
    operator: LogicalOperator,
    catalog: &AttributeCatalog,
) -> Option<Condition> {
    if left.attribute != right.attribute {
        return None;
    }
    let same_side = (left.comparison.is_lower_bound() && right.comparison.is_lower_bound())
        || (left.comparison.is_upper_bound() && right.comparison.is_upper_bound());
    if !same_side {
        return None;
    }

    // Both literals must coerce to the type the evaluator would use
    let data_type = catalog
        .data_type(&left.attribute)
        .or_else(|| {
            let literal_type = left.value.data_type();
            (literal_type == right.value.data_type()).then_some(literal_type)
        })?;
    if !data_type.is_numeric() {
        return None;
    }
    let l = data_type.coerce(&left.value.text()).ok()?;
    let r = data_type.coerce(&right.value.text()).ok()?;
    let ordering = l.compare(&r)?;

    let keep_left = match ordering {
        Ordering::Equal => {
            // Same value: AND keeps the strict comparator, OR the inclusive one
            let want_strict = operator == LogicalOperator::And;
            left.comparison.is_strict() == want_strict
        }
        ordering => {
            // AND wants the tighter bound, OR the looser one
            let left_is_larger = ordering == Ordering::Greater;
            let lower = left.comparison.is_lower_bound();
            let tighter_is_left = if lower { left_is_larger } else { !left_is_larger };
            tighter_is_left == (operator == LogicalOperator::And)
        }
    };

    Some(if keep_left { left.clone() } else { right.clone() })
}
