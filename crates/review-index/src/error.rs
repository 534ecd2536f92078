//! Vectorization pipeline error types.

use thiserror::Error;

/// Errors that can occur while vectorizing reviews.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Store operation failed
    #[error("Store error: {0}")]
    Store(#[from] review_store::StoreError),

    /// Embedding model failed at the batch level
    #[error("Embedding error: {0}")]
    Embedding(#[from] review_embeddings::EmbeddingError),

    /// Records file could not be parsed
    #[error("Records error: {0}")]
    Records(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
