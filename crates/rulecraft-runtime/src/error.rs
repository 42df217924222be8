//! Engine error types

use rulecraft_core::CoreError;
use rulecraft_parser::ParseError;
use rulecraft_repository::RepositoryError;
use thiserror::Error;

/// Engine error
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed rule string
    #[error("Syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// Bad catalog entry, malformed modification or combine request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown rule id or node id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Evaluation could not proceed, e.g. a missing attribute binding
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Value not coercible to the attribute's type
    #[error("Type error: {0}")]
    Type(String),

    /// Persistence failed; the engine state was left unchanged
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl EngineError {
    /// Stable snake_case name of the error category
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Syntax(_) => "syntax_error",
            EngineError::Validation(_) => "validation_error",
            EngineError::NotFound(_) => "not_found",
            EngineError::Evaluation(_) => "evaluation_error",
            EngineError::Type(_) => "type_error",
            EngineError::Storage(_) => "storage_error",
        }
    }

    /// Whether the caller caused the error
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EngineError::Storage(_))
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TypeError(msg) => EngineError::Type(msg),
            other => EngineError::Validation(other.to_string()),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
