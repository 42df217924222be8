//! Rule engine initialization
//!
//! Turns the server configuration into a [`RuleEngine`]: picks the storage
//! backend, restores the last snapshot and seeds the default attributes.

use crate::config::{ServerConfig, StorageConfig};
use anyhow::{Context, Result};
use rulecraft_repository::{FileSystemRepository, MemoryRepository, Repository};
use rulecraft_runtime::{RuleEngine, RuleEngineBuilder};
use std::sync::Arc;
use tracing::info;

/// Build the repository selected by `storage`
pub fn init_repository(storage: &StorageConfig) -> Result<Arc<dyn Repository>> {
    let repository: Arc<dyn Repository> = match storage {
        StorageConfig::Memory => Arc::new(MemoryRepository::new()),
        StorageConfig::FileSystem { path } => {
            let repository = FileSystemRepository::new(path).with_context(|| {
                format!("Failed to open data directory {}", path.display())
            })?;
            info!("Persisting rules to {}", repository.snapshot_path().display());
            Arc::new(repository)
        }
    };
    Ok(repository)
}

/// Initialize the rule engine
pub async fn init_engine(config: &ServerConfig) -> Result<RuleEngine> {
    let repository = init_repository(&config.storage)?;
    let backend = repository.name();

    let engine = RuleEngineBuilder::new()
        .with_repository(repository)
        .with_default_attributes(config.seed_default_attributes)
        .strict_attributes(config.strict_attributes)
        .build()
        .await
        .context("Failed to initialize rule engine")?;

    let (rules, attributes) = engine.stats().await;
    info!(
        backend,
        rules,
        attributes,
        strict_attributes = config.strict_attributes,
        "Rule engine initialized"
    );

    Ok(engine)
}
