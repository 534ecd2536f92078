//! Model file resolution.
//!
//! Fetches config, tokenizer, and weights from HuggingFace Hub into a local
//! cache directory; later runs resolve from the cache without touching the
//! network.

use std::path::PathBuf;
use tracing::{debug, info};

use review_types::ModelSettings;

use crate::error::EmbeddingError;

/// Default model repository on HuggingFace
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Model cache configuration
#[derive(Debug, Clone)]
pub struct ModelCache {
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// Model repository ID
    pub repo_id: String,
}

impl Default for ModelCache {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("review-search")
            .join("models");

        Self {
            cache_dir,
            repo_id: DEFAULT_MODEL_REPO.to_string(),
        }
    }
}

impl ModelCache {
    /// Create a model cache with custom settings
    pub fn new(cache_dir: impl Into<PathBuf>, repo_id: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            repo_id: repo_id.into(),
        }
    }

    /// Build from configuration, falling back to the default cache location.
    pub fn from_settings(settings: &ModelSettings) -> Self {
        let mut cache = ModelCache::default();
        cache.repo_id = settings.repo_id.clone();
        if let Some(dir) = &settings.cache_dir {
            cache.cache_dir = PathBuf::from(dir);
        }
        cache
    }
}

/// Paths to the resolved model files
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Resolve model files, downloading into the cache on first use.
pub fn fetch_model(cache: &ModelCache) -> Result<ModelPaths, EmbeddingError> {
    use hf_hub::api::sync::ApiBuilder;

    std::fs::create_dir_all(&cache.cache_dir)?;

    let api = ApiBuilder::new()
        .with_cache_dir(cache.cache_dir.clone())
        .build()
        .map_err(|e| EmbeddingError::Download(e.to_string()))?;
    let repo = api.model(cache.repo_id.clone());

    info!(repo = %cache.repo_id, "Resolving model files");

    let get = |filename: &str| -> Result<PathBuf, EmbeddingError> {
        let path = repo
            .get(filename)
            .map_err(|e| EmbeddingError::Download(format!("{}: {}", filename, e)))?;
        debug!(file = filename, path = ?path, "Resolved");
        Ok(path)
    };

    Ok(ModelPaths {
        config: get("config.json")?,
        tokenizer: get("tokenizer.json")?,
        weights: get("model.safetensors")?,
    })
}
