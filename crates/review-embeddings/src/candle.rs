//! Candle-based sentence embedder.
//!
//! all-MiniLM-L6-v2 (BERT encoder, mean pooling over non-padding tokens),
//! producing 384-dimensional vectors.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::cache::{fetch_model, ModelCache};
use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Embedding dimension for all-MiniLM-L6-v2
pub const EMBEDDING_DIM: usize = 384;

/// Maximum sequence length in tokens
pub const MAX_SEQ_LENGTH: usize = 256;

/// Sentence embedder backed by a local Candle BERT model.
pub struct SentenceEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    info: ModelInfo,
}

impl SentenceEmbedder {
    /// Load the model, downloading files into the cache if needed.
    ///
    /// Any failure here (download, config parse, weight load) is reported
    /// as [`EmbeddingError::ModelUnavailable`], once. Callers that get a
    /// working embedder never see load errors from `embed`.
    pub fn load(cache: &ModelCache) -> Result<Self, EmbeddingError> {
        Self::try_load(cache)
            .map_err(|e| EmbeddingError::ModelUnavailable(e.to_string()))
    }

    /// Load with default cache settings
    pub fn load_default() -> Result<Self, EmbeddingError> {
        Self::load(&ModelCache::default())
    }

    fn try_load(cache: &ModelCache) -> Result<Self, EmbeddingError> {
        let paths = fetch_model(cache)?;

        info!(repo = %cache.repo_id, "Loading embedding model");

        // CPU inference; GPU support would come in behind a feature flag
        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(&paths.config)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| EmbeddingError::ModelUnavailable(format!("invalid model config: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&paths.tokenizer)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[paths.weights.clone()], DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;

        info!(dim = EMBEDDING_DIM, max_seq = MAX_SEQ_LENGTH, "Model ready");

        Ok(Self {
            model,
            tokenizer,
            device,
            info: ModelInfo {
                name: "all-MiniLM-L6-v2".to_string(),
                dimension: EMBEDDING_DIM,
                max_sequence_length: MAX_SEQ_LENGTH,
            },
        })
    }

    /// Mean pooling over token embeddings, weighted by the attention mask so
    /// padding tokens do not contribute.
    fn mean_pooling(
        &self,
        token_embeddings: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor, EmbeddingError> {
        let mask = attention_mask
            .unsqueeze(2)?
            .broadcast_as(token_embeddings.shape())?
            .to_dtype(DType::F32)?;

        let summed = token_embeddings.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;

        Ok(summed.broadcast_div(&counts)?)
    }
}

impl EmbeddingModel for SentenceEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text])?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidInput("empty batch result".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(count = texts.len(), "Embedding batch");

        // Tokenizer handles truncation and batch-longest padding
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let mut id_rows = Vec::with_capacity(encodings.len());
        let mut mask_rows = Vec::with_capacity(encodings.len());
        for encoding in &encodings {
            id_rows.push(Tensor::new(encoding.get_ids(), &self.device)?);
            mask_rows.push(Tensor::new(encoding.get_attention_mask(), &self.device)?);
        }

        let input_ids = Tensor::stack(&id_rows, 0)?;
        let attention_mask = Tensor::stack(&mask_rows, 0)?;
        let token_type_ids = Tensor::zeros_like(&input_ids)?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = self.mean_pooling(&output, &attention_mask)?;
        let rows: Vec<Vec<f32>> = pooled.to_vec2()?;

        let embeddings: Vec<Embedding> = rows.into_iter().map(Embedding::from_model_output).collect();

        debug!(count = embeddings.len(), dim = EMBEDDING_DIM, "Batch complete");
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These need the real model files; run with --ignored after a download.

    #[test]
    #[ignore = "requires model download"]
    fn test_load_model() {
        let embedder = SentenceEmbedder::load_default().unwrap();
        assert_eq!(embedder.info().dimension, EMBEDDING_DIM);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_embed_dimension() {
        let embedder = SentenceEmbedder::load_default().unwrap();
        let emb = embedder.embed("The battery lasts all day.").unwrap();
        assert_eq!(emb.dimension(), EMBEDDING_DIM);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_embed_deterministic() {
        let embedder = SentenceEmbedder::load_default().unwrap();
        let a = embedder.embed("Build quality is poor.").unwrap();
        let b = embedder.embed("Build quality is poor.").unwrap();
        assert_eq!(a.values, b.values);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_embed_batch_order_preserving() {
        let embedder = SentenceEmbedder::load_default().unwrap();
        let texts = vec!["battery drains fast", "excellent screen", "battery drains fast"];
        let embeddings = embedder.embed_batch(&texts).unwrap();
        assert_eq!(embeddings.len(), 3);
        assert_eq!(embeddings[0].values, embeddings[2].values);
    }

    #[test]
    fn test_load_unavailable_model() {
        let temp = tempfile::TempDir::new().unwrap();
        let cache = ModelCache::new(temp.path().join("nope"), "no-such-org/no-such-model");
        let result = SentenceEmbedder::load(&cache);
        assert!(matches!(result, Err(EmbeddingError::ModelUnavailable(_))));
    }
}
