//! Unit tests for RepositoryError display and conversions

use rulecraft_repository::RepositoryError;
use std::path::PathBuf;

#[test]
fn test_error_invalid_path_display() {
    let error = RepositoryError::InvalidPath {
        path: PathBuf::from("/invalid/path"),
    };

    assert_eq!(error.to_string(), "Invalid path: /invalid/path");
}

#[test]
fn test_error_corrupt_display() {
    let error = RepositoryError::Corrupt("duplicate rule id 3".to_string());

    assert_eq!(error.to_string(), "Corrupt snapshot: duplicate rule id 3");
}

#[test]
fn test_error_other_display() {
    let error = RepositoryError::Other("disk gone".to_string());

    assert_eq!(error.to_string(), "Repository error: disk gone");
}

#[test]
fn test_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: RepositoryError = io_error.into();

    assert!(matches!(error, RepositoryError::Io(_)));
    assert!(error.to_string().starts_with("I/O error"));
}

#[test]
fn test_error_from_serde_json() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: RepositoryError = json_error.into();

    assert!(matches!(error, RepositoryError::Serialization(_)));
    assert!(error.to_string().starts_with("Failed to parse snapshot"));
}
