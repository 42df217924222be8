//! Operators of the rule language

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Logical operators joining two sub-rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    /// Both sides must hold
    And,
    /// At least one side must hold
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }

    /// Binding power used by the parser; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            LogicalOperator::Or => 1,
            LogicalOperator::And => 2,
        }
    }

    /// Combine two already evaluated sides
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            LogicalOperator::And => left && right,
            LogicalOperator::Or => left || right,
        }
    }

    /// The value of `left` that decides the result without looking at `right`
    pub fn short_circuits_on(&self) -> bool {
        match self {
            LogicalOperator::And => false,
            LogicalOperator::Or => true,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalOperator {
    type Err = CoreError;

    /// Keywords are case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(LogicalOperator::And),
            "OR" => Ok(LogicalOperator::Or),
            _ => Err(CoreError::UnknownOperator(s.to_string())),
        }
    }
}

/// Comparison operators used by operand nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// Greater than (>)
    #[serde(rename = ">")]
    Gt,
    /// Less than (<)
    #[serde(rename = "<")]
    Lt,
    /// Greater than or equal (>=)
    #[serde(rename = ">=")]
    Ge,
    /// Less than or equal (<=)
    #[serde(rename = "<=")]
    Le,
    /// Equal (=)
    #[serde(rename = "=")]
    Eq,
    /// Not equal (!=)
    #[serde(rename = "!=")]
    Ne,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Gt,
        Comparison::Lt,
        Comparison::Ge,
        Comparison::Le,
        Comparison::Eq,
        Comparison::Ne,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
        }
    }

    /// Apply the comparison to an ordering of `actual` relative to `expected`.
    ///
    /// `None` means the two values are unordered (a NaN was involved), in
    /// which case only `!=` holds.
    pub fn matches(&self, ordering: Option<Ordering>) -> bool {
        match ordering {
            None => matches!(self, Comparison::Ne),
            Some(ord) => match self {
                Comparison::Gt => ord == Ordering::Greater,
                Comparison::Lt => ord == Ordering::Less,
                Comparison::Ge => ord != Ordering::Less,
                Comparison::Le => ord != Ordering::Greater,
                Comparison::Eq => ord == Ordering::Equal,
                Comparison::Ne => ord != Ordering::Equal,
            },
        }
    }

    /// `>` and `>=`
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Comparison::Gt | Comparison::Ge)
    }

    /// `<` and `<=`
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, Comparison::Lt | Comparison::Le)
    }

    /// `>` and `<`
    pub fn is_strict(&self) -> bool {
        matches!(self, Comparison::Gt | Comparison::Lt)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparison::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| CoreError::UnknownComparison(s.to_string()))
    }
}
