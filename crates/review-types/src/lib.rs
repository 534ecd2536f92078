//! # review-types
//!
//! Shared domain types for the review-search pipeline.
//!
//! This crate defines the data structures that cross crate boundaries:
//! - `ReviewRecord`: a preprocessed product review supplied by the upstream
//!   preprocessing stage
//! - `StoredReview`: the review row as persisted alongside its vector
//! - `Settings`: layered configuration

pub mod config;
pub mod error;
pub mod record;

pub use config::{ModelSettings, Settings};
pub use error::ReviewError;
pub use record::{ReviewRecord, StoredReview};
