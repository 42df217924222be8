//! Unit tests for FileSystemRepository
//!
//! Covers first start, save/load round trips, atomic replacement and
//! rejection of damaged snapshot files.

use rulecraft_core::{Attribute, Comparison, DataType, Expr, Rule};
use rulecraft_repository::{FileSystemRepository, Repository, RepositoryError, Snapshot, SNAPSHOT_FILE};
use tempfile::TempDir;
use tokio::fs;

fn sample_snapshot() -> Snapshot {
    let expr = Expr::or(
        Expr::and(
            Expr::condition("age", Comparison::Gt, 30),
            Expr::condition("department", Comparison::Eq, "Sales"),
        ),
        Expr::condition("salary", Comparison::Ge, 5000.5),
    );
    Snapshot {
        attributes: vec![
            Attribute::new(1, "age", DataType::Int),
            Attribute::new(2, "department", DataType::String),
            Attribute::new(3, "salary", DataType::Float),
        ],
        rules: vec![Rule::new(
            1,
            "senior sales",
            &expr,
            "(age > 30 AND department = 'Sales') OR salary >= 5000.5",
        )],
        next_attribute_id: 4,
        next_rule_id: 2,
    }
}

#[tokio::test]
async fn test_missing_directory_loads_none() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemRepository::new(temp_dir.path().join("not_yet")).unwrap();

    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_creates_directory_and_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("nested/data");
    let repo = FileSystemRepository::new(&root).unwrap();

    repo.save(&sample_snapshot()).await.unwrap();

    assert!(root.join(SNAPSHOT_FILE).exists());
    assert!(!root.join(format!("{}.tmp", SNAPSHOT_FILE)).exists());
}

#[tokio::test]
async fn test_round_trip_preserves_rules_and_counters() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemRepository::new(temp_dir.path()).unwrap();
    let snapshot = sample_snapshot();

    repo.save(&snapshot).await.unwrap();

    // A fresh instance sees the same state, as after a restart
    let reopened = FileSystemRepository::new(temp_dir.path()).unwrap();
    let loaded = reopened.load().await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.rules[0].to_expr(), snapshot.rules[0].to_expr());
    assert_eq!(loaded.next_rule_id, 2);
}

#[tokio::test]
async fn test_save_replaces_previous_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FileSystemRepository::new(temp_dir.path()).unwrap();

    repo.save(&sample_snapshot()).await.unwrap();
    repo.save(&Snapshot::default()).await.unwrap();

    let loaded = repo.load().await.unwrap().unwrap();
    assert!(loaded.rules.is_empty());
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(SNAPSHOT_FILE), "{ not json")
        .await
        .unwrap();
    let repo = FileSystemRepository::new(temp_dir.path()).unwrap();

    let result = repo.load().await;
    assert!(matches!(result, Err(RepositoryError::Serialization(_))));
}

#[tokio::test]
async fn test_inconsistent_snapshot_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut snapshot = sample_snapshot();
    snapshot.next_rule_id = 1;
    fs::write(
        temp_dir.path().join(SNAPSHOT_FILE),
        serde_json::to_string(&snapshot).unwrap(),
    )
    .await
    .unwrap();
    let repo = FileSystemRepository::new(temp_dir.path()).unwrap();

    let result = repo.load().await;
    assert!(matches!(result, Err(RepositoryError::Corrupt(_))));
}

#[test]
fn test_file_as_root_is_invalid_path() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("plain.txt");
    std::fs::write(&file, "x").unwrap();

    let result = FileSystemRepository::new(&file);
    assert!(matches!(result, Err(RepositoryError::InvalidPath { .. })));
}

#[test]
fn test_paths_are_absolute() {
    let repo = FileSystemRepository::new("relative/data").unwrap();
    assert!(repo.root_path().is_absolute());
    assert!(repo.snapshot_path().ends_with(SNAPSHOT_FILE));
}
