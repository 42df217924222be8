//! Builder pattern for RuleEngine

use crate::engine::{EngineOptions, EngineState, RuleEngine};
use crate::error::Result;
use rulecraft_repository::{MemoryRepository, Repository};
use std::sync::Arc;
use tracing::info;

/// Builder for RuleEngine
///
/// # Example
///
/// ```rust,ignore
/// use rulecraft_repository::FileSystemRepository;
/// use rulecraft_runtime::RuleEngineBuilder;
/// use std::sync::Arc;
///
/// let engine = RuleEngineBuilder::new()
///     .with_repository(Arc::new(FileSystemRepository::new("data")?))
///     .with_default_attributes(true)
///     .build()
///     .await?;
/// ```
pub struct RuleEngineBuilder {
    repository: Option<Arc<dyn Repository>>,
    options: EngineOptions,
    seed_default_attributes: bool,
}

impl Default for RuleEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngineBuilder {
    /// Create a new builder: in-memory storage, lazy attribute checks,
    /// empty catalog
    pub fn new() -> Self {
        Self {
            repository: None,
            options: EngineOptions::default(),
            seed_default_attributes: false,
        }
    }

    /// Persist state through `repository` and restore from it on build
    pub fn with_repository(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Register the default attributes when the restored catalog is empty
    pub fn with_default_attributes(mut self, enabled: bool) -> Self {
        self.seed_default_attributes = enabled;
        self
    }

    /// Require rule attributes to be registered before use
    pub fn strict_attributes(mut self, enabled: bool) -> Self {
        self.options.strict_attributes = enabled;
        self
    }

    /// Build the engine, restoring the last saved snapshot if there is one
    pub async fn build(self) -> Result<RuleEngine> {
        let repository: Arc<dyn Repository> = match self.repository {
            Some(repository) => repository,
            None => Arc::new(MemoryRepository::new()),
        };

        let state = match repository.load().await? {
            Some(snapshot) => {
                info!(
                    backend = repository.name(),
                    rules = snapshot.rules.len(),
                    attributes = snapshot.attributes.len(),
                    "Restored engine state"
                );
                EngineState::from_snapshot(snapshot)
            }
            None => {
                info!(backend = repository.name(), "Starting with empty engine state");
                EngineState::default()
            }
        };

        let engine = RuleEngine::from_parts(state, repository, self.options);
        if self.seed_default_attributes {
            engine.seed_default_attributes().await?;
        }
        Ok(engine)
    }
}
