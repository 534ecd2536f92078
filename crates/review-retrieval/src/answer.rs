//! Answer generation over retrieved reviews.
//!
//! The summarizer itself is a black box behind the [`Summarizer`] trait;
//! this module owns the context assembly and the zero-result fallback.

use tracing::{error, warn};

use crate::engine::QueryEngine;
use crate::error::RetrievalError;

/// Returned when nothing was retrieved or the summarizer failed.
pub const FALLBACK_ANSWER: &str = "Sorry, I could not generate a response.";

/// Downstream text generator.
pub trait Summarizer: Send + Sync {
    /// Produce a summary or answer from retrieval context and the query.
    fn summarize(&self, context: &str, query: &str) -> Result<String, RetrievalError>;
}

/// Retrieve the top-k reviews for the query and summarize them.
///
/// Zero retrieved records yields [`FALLBACK_ANSWER`] without invoking the
/// summarizer; a summarizer failure also degrades to the fallback rather
/// than surfacing an error to the user.
pub fn answer<S: Summarizer>(
    engine: &QueryEngine,
    summarizer: &S,
    query: &str,
    k: usize,
) -> Result<String, RetrievalError> {
    let retrieved = engine.retrieve(query, k)?;

    if retrieved.is_empty() {
        warn!(query = %query, "No reviews retrieved, returning fallback answer");
        return Ok(FALLBACK_ANSWER.to_string());
    }

    let context: String = retrieved
        .iter()
        .map(|r| r.review.record.review_text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    match summarizer.summarize(&context, query) {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(error = %e, "Summarizer failed");
            Ok(FALLBACK_ANSWER.to_string())
        }
    }
}
