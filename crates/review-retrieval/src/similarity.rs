//! Brute-force cosine similarity retrieval.
//!
//! Exact O(n·d) scan over the whole corpus. Scoring contract:
//! - score = dot(query, v) / (‖query‖ · ‖v‖), in [-1, 1]
//! - a zero-norm vector on either side scores 0 (no division by zero)
//! - ties break by corpus insertion order (stable sort)

use std::cmp::Ordering;

use tracing::warn;

use review_embeddings::Embedding;

/// One ranked retrieval hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub review_id: String,
    pub score: f64,
}

/// Cosine similarity between two vectors.
///
/// Mismatched lengths and zero-norm inputs score 0 rather than erroring; the
/// scan-level dimension contract is enforced by the caller.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Score every corpus vector against the query and return the top k.
///
/// Returns fewer than `k` entries when the corpus is smaller; an empty
/// corpus yields an empty result (logged as a warning, not an error). A
/// corpus entry whose dimension differs from the query scores 0 and is
/// logged with its ID.
pub fn top_k(query: &Embedding, k: usize, corpus: &[(String, Embedding)]) -> Vec<SimilarityResult> {
    if corpus.is_empty() {
        warn!("No embeddings in corpus, returning empty result");
        return Vec::new();
    }
    if k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<SimilarityResult> = corpus
        .iter()
        .map(|(review_id, vector)| {
            if vector.dimension() != query.dimension() {
                warn!(
                    review_id = %review_id,
                    expected = query.dimension(),
                    actual = vector.dimension(),
                    "Corpus vector dimension differs from query, scoring 0"
                );
            }
            SimilarityResult {
                review_id: review_id.clone(),
                score: cosine_similarity(&query.values, &vector.values),
            }
        })
        .collect();

    // Stable sort: equal scores keep corpus order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}
