//! # review-embeddings
//!
//! Local sentence embedding generation for review-search using Candle.
//!
//! Maps review text to fixed-length numeric vectors with the
//! all-MiniLM-L6-v2 model (384 dimensions). Inference is local; model files
//! are fetched once from HuggingFace Hub and cached.
//!
//! Model load failures surface once, at construction, as
//! [`EmbeddingError::ModelUnavailable`], never per call.

pub mod cache;
pub mod candle;
pub mod error;
pub mod model;

pub use cache::{fetch_model, ModelCache, ModelPaths, DEFAULT_MODEL_REPO};
pub use candle::{SentenceEmbedder, EMBEDDING_DIM, MAX_SEQ_LENGTH};
pub use error::EmbeddingError;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
