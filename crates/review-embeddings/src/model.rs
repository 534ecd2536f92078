//! Embedding vector type and the model trait.

use crate::error::EmbeddingError;

/// A fixed-length embedding vector.
///
/// Values are kept exactly as the model produced them (no normalization);
/// cosine scoring downstream divides by the norms itself. The model runs at
/// f32 precision, values are widened to f64 at this boundary so the codec
/// and store can guarantee a lossless double-precision round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f64>,
}

impl Embedding {
    /// Create an embedding from double-precision values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Widen raw f32 model output into an embedding.
    pub fn from_model_output(values: Vec<f32>) -> Self {
        Self {
            values: values.into_iter().map(f64::from).collect(),
        }
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub name: String,
    /// Embedding dimension
    pub dimension: usize,
    /// Maximum sequence length in tokens
    pub max_sequence_length: usize,
}

/// Trait for embedding models.
///
/// Implementations must be thread-safe (Send + Sync). `embed_batch` is
/// length- and order-preserving: output `i` always corresponds to input `i`.
pub trait EmbeddingModel: Send + Sync {
    /// Get model information
    fn info(&self) -> &ModelInfo;

    /// Generate an embedding for a single text.
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Generate embeddings for multiple texts.
    /// Default implementation calls embed() for each text.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Generate embeddings for multiple owned strings.
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        self.embed_batch(&refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_model_output_widens() {
        let emb = Embedding::from_model_output(vec![0.5f32, -0.25f32]);
        assert_eq!(emb.values, vec![0.5f64, -0.25f64]);
        assert_eq!(emb.dimension(), 2);
    }

    #[test]
    fn test_norm() {
        let emb = Embedding::new(vec![3.0, 4.0]);
        assert!((emb.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_norm_zero_vector() {
        let emb = Embedding::new(vec![0.0, 0.0, 0.0]);
        assert_eq!(emb.norm(), 0.0);
    }

    #[test]
    fn test_values_not_normalized() {
        let emb = Embedding::new(vec![3.0, 4.0]);
        assert_eq!(emb.values, vec![3.0, 4.0]);
    }
}
