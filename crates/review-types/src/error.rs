//! Error types shared across the review-search pipeline.

use thiserror::Error;

/// Unified error type for cross-cutting concerns.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
