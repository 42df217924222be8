//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variable overrides, e.g. `RULECRAFT_PORT=8080`
pub const ENV_PREFIX: &str = "RULECRAFT";

/// Where engine state is persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Keep state in process memory only
    #[default]
    Memory,
    /// Snapshot state to `<path>/rules.json`
    FileSystem {
        /// Data directory (default: "data")
        #[serde(default = "default_storage_path")]
        path: PathBuf,
    },
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data")
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (HTTP)
    pub port: u16,

    /// Persistence backend
    pub storage: StorageConfig,

    /// Register the built-in attributes when the catalog starts empty
    pub seed_default_attributes: bool,

    /// Reject rules that reference unregistered attributes
    pub strict_attributes: bool,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Log level for the workspace crates, used when `RUST_LOG` is unset
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            storage: StorageConfig::default(),
            seed_default_attributes: true,
            strict_attributes: false,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, `config/server.*` and environment
    /// variables, in increasing order of priority
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        Self::load_from("config/server")
    }

    /// Load configuration from the file `base` (extension optional) and
    /// environment variables. A missing file yields the defaults.
    pub fn load_from(base: impl AsRef<Path>) -> anyhow::Result<Self> {
        let base = base.as_ref().to_string_lossy();

        let cfg = config::Config::builder()
            .add_source(config::File::with_name(&base).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to read configuration from {}: {}", base, e))?;

        cfg.try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))
    }

    /// `host:port` to bind
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Default `EnvFilter` directives, applied when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> String {
        format!(
            "rulecraft_server={0},rulecraft_runtime={0},tower_http=debug",
            self.log_level
        )
    }
}
