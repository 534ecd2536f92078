//! Query engine: the retrieval context object.
//!
//! Holds the loaded embedding model and the store handle, explicitly
//! constructed and explicitly passed, with no process-wide singletons. One
//! `retrieve` call embeds the query, scans the corpus, and resolves the
//! winning IDs back to full review rows.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use review_embeddings::EmbeddingModel;
use review_store::VectorStore;
use review_types::StoredReview;

use crate::error::RetrievalError;
use crate::similarity::top_k;

/// A retrieved review with its similarity score.
#[derive(Debug, Clone)]
pub struct RetrievedReview {
    pub review: StoredReview,
    pub score: f64,
}

/// Retrieval context: embedding model + vector store.
pub struct QueryEngine {
    embedder: Arc<dyn EmbeddingModel>,
    store: Arc<VectorStore>,
}

impl QueryEngine {
    pub fn new(embedder: Arc<dyn EmbeddingModel>, store: Arc<VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Retrieve the k reviews most similar to the query text.
    ///
    /// An empty corpus is a valid empty outcome, not an error. A query whose
    /// embedding dimension differs from the stored corpus fails with
    /// [`RetrievalError::DimensionMismatch`].
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedReview>, RetrievalError> {
        debug!(query = %query, k = k, "Retrieving similar reviews");

        let query_embedding = self.embedder.embed(query)?;
        let corpus = self.store.load_all()?;

        if corpus.is_empty() {
            warn!("No embeddings in store, returning empty result");
            return Ok(Vec::new());
        }

        let corpus_dim = corpus[0].1.dimension();
        if query_embedding.dimension() != corpus_dim {
            return Err(RetrievalError::DimensionMismatch {
                expected: corpus_dim,
                actual: query_embedding.dimension(),
            });
        }

        let ranked = top_k(&query_embedding, k, &corpus);
        let ids: Vec<String> = ranked.iter().map(|r| r.review_id.clone()).collect();
        let scores: HashMap<&str, f64> = ranked
            .iter()
            .map(|r| (r.review_id.as_str(), r.score))
            .collect();

        // find_by_ids preserves the ranked order and omits IDs with no row
        let rows = self.store.find_by_ids(&ids)?;
        let results: Vec<RetrievedReview> = rows
            .into_iter()
            .map(|review| {
                let score = scores.get(review.review_id()).copied().unwrap_or(0.0);
                RetrievedReview { review, score }
            })
            .collect();

        info!(
            requested = k,
            scanned = corpus.len(),
            resolved = results.len(),
            "Retrieval complete"
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_embeddings::{Embedding, EmbeddingError, ModelInfo};
    use review_types::ReviewRecord;
    use tempfile::TempDir;

    /// Embeds a handful of known phrases onto fixed 2-d directions.
    struct PhraseEmbedder {
        info: ModelInfo,
    }

    impl PhraseEmbedder {
        fn new() -> Self {
            Self {
                info: ModelInfo {
                    name: "phrase".to_string(),
                    dimension: 2,
                    max_sequence_length: 16,
                },
            }
        }
    }

    impl EmbeddingModel for PhraseEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            let values = match text {
                t if t.contains("battery") => vec![1.0, 0.0],
                t if t.contains("screen") => vec![0.0, 1.0],
                _ => vec![0.7, 0.7],
            };
            Ok(Embedding::new(values))
        }
    }

    fn record(id: &str, text: &str) -> ReviewRecord {
        ReviewRecord {
            review_id: id.to_string(),
            review_text: text.to_string(),
            rating: 3.0,
            cleaned_review_text: text.to_lowercase(),
            sentiment_score: None,
            normalized_rating: 0.5,
        }
    }

    fn engine_with_corpus(temp: &TempDir) -> QueryEngine {
        let store = Arc::new(VectorStore::open(temp.path()).unwrap());
        store
            .replace_all(&[
                ("battery-1".to_string(), Embedding::new(vec![1.0, 0.0])),
                ("screen-1".to_string(), Embedding::new(vec![0.0, 1.0])),
                ("battery-2".to_string(), Embedding::new(vec![0.9, 0.1])),
            ])
            .unwrap();
        store
            .put_reviews(&[
                record("battery-1", "Battery dies fast"),
                record("screen-1", "Screen is gorgeous"),
                record("battery-2", "Battery barely lasts a day"),
            ])
            .unwrap();

        QueryEngine::new(Arc::new(PhraseEmbedder::new()), store)
    }

    #[test]
    fn test_retrieve_ranks_by_similarity() {
        let temp = TempDir::new().unwrap();
        let engine = engine_with_corpus(&temp);

        let results = engine.retrieve("battery life", 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].review.review_id(), "battery-1");
        assert_eq!(results[1].review.review_id(), "battery-2");
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_retrieve_empty_store_is_empty_not_error() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(VectorStore::open(temp.path()).unwrap());
        let engine = QueryEngine::new(Arc::new(PhraseEmbedder::new()), store);

        let results = engine.retrieve("anything", 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_retrieve_omits_ids_without_rows() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(VectorStore::open(temp.path()).unwrap());
        store
            .replace_all(&[("orphan".to_string(), Embedding::new(vec![1.0, 0.0]))])
            .unwrap();
        // No review row for "orphan"
        let engine = QueryEngine::new(Arc::new(PhraseEmbedder::new()), store);

        let results = engine.retrieve("battery", 1).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_retrieve_dimension_mismatch() {
        struct WideEmbedder(ModelInfo);
        impl EmbeddingModel for WideEmbedder {
            fn info(&self) -> &ModelInfo {
                &self.0
            }
            fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
                Ok(Embedding::new(vec![1.0, 0.0, 0.0]))
            }
        }

        let temp = TempDir::new().unwrap();
        let store = Arc::new(VectorStore::open(temp.path()).unwrap());
        store
            .replace_all(&[("a".to_string(), Embedding::new(vec![1.0, 0.0]))])
            .unwrap();

        let info = ModelInfo {
            name: "wide".to_string(),
            dimension: 3,
            max_sequence_length: 16,
        };
        let engine = QueryEngine::new(Arc::new(WideEmbedder(info)), store);

        let result = engine.retrieve("query", 1);
        assert!(matches!(
            result,
            Err(RetrievalError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }
}
