//! Error types for Rulecraft Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown logical operator: '{0}' (expected AND or OR)")]
    UnknownOperator(String),

    #[error("Unknown comparison operator: '{0}' (expected one of >, <, >=, <=, =, !=)")]
    UnknownComparison(String),

    #[error("Unknown data type: '{0}' (expected int, float or string)")]
    UnknownDataType(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
