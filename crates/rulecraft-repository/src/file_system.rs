//! File system based repository implementation
//!
//! The snapshot lives in a single JSON file, `<root>/rules.json`. Saves go
//! to a sibling temp file first and are renamed into place, so a crash
//! mid-write leaves the previous snapshot intact.

use async_trait::async_trait;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::SNAPSHOT_FILE;
use crate::{Repository, RepositoryError, RepositoryResult, Snapshot};

/// File system based repository
pub struct FileSystemRepository {
    /// Directory holding the snapshot file
    root_path: PathBuf,
    /// Serializes writers so temp files never collide
    write_lock: Mutex<()>,
}

impl FileSystemRepository {
    /// Create a repository rooted at `root_path`.
    ///
    /// The directory does not need to exist yet; it is created on the first
    /// save. A path that exists but is not a directory is rejected.
    pub fn new<P: AsRef<Path>>(root_path: P) -> RepositoryResult<Self> {
        let path = root_path.as_ref();

        if path.exists() && !path.is_dir() {
            return Err(RepositoryError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let abs_path = path
            .absolutize()
            .map_err(|e| RepositoryError::Other(format!("Failed to absolutize path: {}", e)))?
            .to_path_buf();

        Ok(Self {
            root_path: abs_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of the repository
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Full path of the snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        self.root_path.join(SNAPSHOT_FILE)
    }

    fn temp_path(&self) -> PathBuf {
        self.root_path.join(format!("{}.tmp", SNAPSHOT_FILE))
    }
}

#[async_trait]
impl Repository for FileSystemRepository {
    async fn load(&self) -> RepositoryResult<Option<Snapshot>> {
        let path = self.snapshot_path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;

        info!(
            "Loaded snapshot from {} ({} attributes, {} rules)",
            path.display(),
            snapshot.attributes.len(),
            snapshot.rules.len()
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> RepositoryResult<()> {
        let content = serde_json::to_string_pretty(snapshot)?;

        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.root_path).await?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, self.snapshot_path()).await?;

        debug!(
            "Saved snapshot to {} ({} rules)",
            self.root_path.display(),
            snapshot.rules.len()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}
