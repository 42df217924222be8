//! In-memory repository
//!
//! Keeps the last saved snapshot for the lifetime of the process. Used when
//! no durable storage is configured, and in tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Repository, RepositoryResult, Snapshot};

/// Repository that never touches disk
#[derive(Debug, Default)]
pub struct MemoryRepository {
    snapshot: RwLock<Option<Snapshot>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved snapshot
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn load(&self) -> RepositoryResult<Option<Snapshot>> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_repository_loads_none() {
        let repo = MemoryRepository::new();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let repo = MemoryRepository::new();
        let snapshot = Snapshot {
            next_rule_id: 4,
            ..Snapshot::default()
        };
        repo.save(&snapshot).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_with_snapshot() {
        let repo = MemoryRepository::with_snapshot(Snapshot::default());
        assert_eq!(repo.load().await.unwrap(), Some(Snapshot::default()));
    }
}
