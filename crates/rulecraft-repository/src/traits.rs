//! Core trait definition for snapshot storage
//!
//! The engine keeps all state in memory and hands a full [`Snapshot`] to the
//! repository after every successful write. On startup it asks the
//! repository for the last saved snapshot.

use async_trait::async_trait;

use crate::{RepositoryResult, Snapshot};

/// Storage backend for engine snapshots
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Load the last saved snapshot, or `None` if nothing was ever saved
    async fn load(&self) -> RepositoryResult<Option<Snapshot>>;

    /// Replace the stored snapshot.
    ///
    /// Either the whole snapshot is stored or the previous one is kept.
    async fn save(&self, snapshot: &Snapshot) -> RepositoryResult<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
