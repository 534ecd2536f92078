//! # review-index
//!
//! Vectorization pipeline: turns preprocessed review records into stored
//! embedding vectors. Batch-embeds `cleaned_review_text` and replaces the
//! persisted corpus in one atomic write.
//!
//! Per-record failures (empty text, an input the model rejects) are logged
//! with the offending review_id and skipped; they never abort the run.

pub mod error;
pub mod pipeline;
pub mod records;

pub use error::IndexError;
pub use pipeline::{VectorizePipeline, VectorizeStats};
pub use records::load_records;
