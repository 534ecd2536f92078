//! Store layer error types.

use thiserror::Error;

/// Errors that can occur in the codec and store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store could not be opened or reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// RocksDB operation failed
    #[error("Database error: {0}")]
    Database(#[from] rocksdb::Error),

    /// Column family not found
    #[error("Column family not found: {0}")]
    ColumnFamilyNotFound(String),

    /// Encoded vector text could not be decoded
    #[error("Malformed vector: {detail}")]
    MalformedVector { detail: String },

    /// Vector dimension does not match the corpus's established dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
