//! Literal and runtime value types
//!
//! A `Literal` is what the rule author wrote (`30`, `4.5`, `'Sales'`).
//! A `Value` is what comparisons actually operate on, after both the bound
//! attribute value and the literal have been coerced to one `DataType`.

use super::attribute::DataType;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Constant on the right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Integer literal
    Integer(i64),
    /// Floating point literal
    Float(f64),
    /// Quoted string literal
    String(String),
}

impl Literal {
    /// The type implied by the literal itself
    pub fn data_type(&self) -> DataType {
        match self {
            Literal::Integer(_) => DataType::Int,
            Literal::Float(_) => DataType::Float,
            Literal::String(_) => DataType::String,
        }
    }

    /// Unquoted textual form, the input to `DataType::coerce`
    pub fn text(&self) -> String {
        match self {
            Literal::Integer(i) => i.to_string(),
            Literal::Float(f) => f.to_string(),
            Literal::String(s) => s.clone(),
        }
    }

    /// Read a literal from free text, as typed into a form field.
    ///
    /// Quoted text is a string; otherwise integer and float forms are tried
    /// before falling back to the bare text as a string.
    pub fn from_text(text: &str) -> Literal {
        let trimmed = text.trim();
        if let Some(inner) = unquote(trimmed) {
            return Literal::String(inner);
        }
        if looks_numeric(trimmed) {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Literal::Integer(i);
            }
            if let Ok(f) = trimmed.parse::<f64>() {
                return Literal::Float(f);
            }
        }
        Literal::String(trimmed.to_string())
    }
}

impl fmt::Display for Literal {
    /// Renders the literal in rule syntax so that it parses back unchanged
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::String(s) => {
                f.write_str("'")?;
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("'")
            }
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

/// Strip matching single or double quotes and resolve backslash escapes
fn unquote(text: &str) -> Option<String> {
    let quote = text.chars().next()?;
    if (quote != '\'' && quote != '"') || text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut escaped = false;
    for c in inner.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Keeps words like `nan` or `inf` from being read as floats
fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Coerced runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
        }
    }

    /// Order two values of the same type.
    ///
    /// Numbers use native ordering, strings lexicographic byte order.
    /// Mixed types and NaN comparisons are unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}
