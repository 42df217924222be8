//! Error types for the repository layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur while loading or saving engine state
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON or has the wrong shape
    #[error("Failed to parse snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Snapshot parsed but violates engine invariants
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    /// Generic error
    #[error("Repository error: {0}")]
    Other(String),
}
