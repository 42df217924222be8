//! Repository abstraction layer for the Rulecraft rule engine
//!
//! The engine persists its whole state (attribute catalog, rules and id
//! counters) as one [`Snapshot`]. This crate provides the storage backends:
//!
//! - **Memory Repository**: process-lifetime storage, the default
//! - **File System Repository**: a JSON file on disk, replaced atomically
//!
//! # Quick Start
//!
//! ```no_run
//! use rulecraft_repository::{FileSystemRepository, Repository, Snapshot};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = FileSystemRepository::new("data")?;
//!
//! let snapshot = repo.load().await?.unwrap_or_default();
//! repo.save(&snapshot).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file_system;
pub mod memory;
pub mod models;
pub mod traits;

pub use error::{RepositoryError, RepositoryResult};
pub use file_system::FileSystemRepository;
pub use memory::MemoryRepository;
pub use models::{Snapshot, SNAPSHOT_FILE};
pub use traits::Repository;
