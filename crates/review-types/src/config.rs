//! Configuration loading for review-search.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! Config file lives at ~/.config/review-search/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ReviewError;

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// HuggingFace repository for the sentence embedding model
    #[serde(default = "default_model_repo")]
    pub repo_id: String,

    /// Directory for cached model files (default under the user cache dir)
    #[serde(default)]
    pub cache_dir: Option<String>,
}

fn default_model_repo() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            repo_id: default_model_repo(),
            cache_dir: None,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the RocksDB vector store directory
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Default number of results returned by a query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Batch size for embedding generation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Embedding model configuration
    #[serde(default)]
    pub model: ModelSettings,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_db_path() -> String {
    ProjectDirs::from("", "", "review-search")
        .map(|p| p.data_local_dir().join("db"))
        .unwrap_or_else(|| PathBuf::from("./data"))
        .to_string_lossy()
        .to_string()
}

fn default_top_k() -> usize {
    5
}

fn default_batch_size() -> usize {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            top_k: default_top_k(),
            batch_size: default_batch_size(),
            model: ModelSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/review-search/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (REVIEW_*, `__` between nesting levels)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ReviewError> {
        let config_dir = ProjectDirs::from("", "", "review-search")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .set_default("top_k", default_top_k() as i64)
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .set_default("batch_size", default_batch_size() as i64)
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .set_default("model.repo_id", default_model_repo())
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| ReviewError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: REVIEW_DB_PATH, REVIEW_TOP_K, REVIEW_MODEL__REPO_ID.
        // Double underscore separates nesting levels so multi-word keys
        // like top_k survive intact.
        builder = builder.add_source(
            Environment::with_prefix("REVIEW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ReviewError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ReviewError::Config(e.to_string()))
    }

    /// Expand ~ in db_path to the actual home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        if self.db_path.starts_with("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                return PathBuf::from(home).join(&self.db_path[2..]);
            }
        }
        PathBuf::from(&self.db_path)
    }
}
