//! Retrieval error types.

use thiserror::Error;

/// Errors that can occur during retrieval.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Embedding the query failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] review_embeddings::EmbeddingError),

    /// Store operation failed
    #[error("Store error: {0}")]
    Store(#[from] review_store::StoreError),

    /// Query vector dimension does not match the stored corpus
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Downstream summarizer failed
    #[error("Summarizer error: {0}")]
    Summarizer(String),
}
