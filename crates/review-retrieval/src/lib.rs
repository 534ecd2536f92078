//! # review-retrieval
//!
//! Semantic retrieval over the stored review corpus.
//!
//! - [`similarity`]: exact brute-force cosine top-k over all stored vectors
//! - [`engine`]: `QueryEngine`, the explicitly constructed context object
//!   tying the embedding model and the vector store together
//! - [`answer`]: summarization seam with an apologetic fallback when nothing
//!   was retrieved

pub mod answer;
pub mod engine;
pub mod error;
pub mod similarity;

pub use answer::{answer, Summarizer, FALLBACK_ANSWER};
pub use engine::{QueryEngine, RetrievedReview};
pub use error::RetrievalError;
pub use similarity::{cosine_similarity, top_k, SimilarityResult};
