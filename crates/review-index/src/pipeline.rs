//! Review vectorization pipeline.
//!
//! Embeds review records in batches and installs the result as the new
//! stored corpus (full replace, atomic). A batch-level embedding failure
//! falls back to per-record embedding so one bad input cannot take its
//! siblings down with it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use review_embeddings::{Embedding, EmbeddingModel};
use review_store::VectorStore;
use review_types::ReviewRecord;

use crate::error::IndexError;

/// Statistics from a vectorization run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VectorizeStats {
    /// Records read from the input
    pub records_seen: usize,
    /// Vectors written to the store
    pub vectors_written: usize,
    /// Records skipped for empty cleaned text
    pub skipped: usize,
    /// Records whose embedding failed
    pub errors: usize,
}

/// Pipeline that embeds review records and replaces the stored corpus.
pub struct VectorizePipeline<E: EmbeddingModel> {
    embedder: Arc<E>,
    store: Arc<VectorStore>,
    batch_size: usize,
}

impl<E: EmbeddingModel> VectorizePipeline<E> {
    pub fn new(embedder: Arc<E>, store: Arc<VectorStore>, batch_size: usize) -> Self {
        Self {
            embedder,
            store,
            batch_size: batch_size.max(1),
        }
    }

    /// Vectorize records and replace the stored collection.
    ///
    /// Writes all review rows (lookup targets) and one vector per record
    /// with embeddable text. Returns run statistics.
    pub fn run(&self, records: &[ReviewRecord]) -> Result<VectorizeStats, IndexError> {
        let mut stats = VectorizeStats {
            records_seen: records.len(),
            ..Default::default()
        };

        if records.is_empty() {
            warn!("No records to vectorize");
            return Ok(stats);
        }

        info!(count = records.len(), "Vectorizing review records");

        let embeddable: Vec<&ReviewRecord> = records
            .iter()
            .filter(|r| {
                if r.has_embeddable_text() {
                    true
                } else {
                    debug!(review_id = %r.review_id, "Empty cleaned text, skipping");
                    false
                }
            })
            .collect();
        stats.skipped = records.len() - embeddable.len();

        let mut vectors: Vec<(String, Embedding)> = Vec::with_capacity(embeddable.len());
        for chunk in embeddable.chunks(self.batch_size) {
            self.embed_chunk(chunk, &mut vectors, &mut stats);
        }

        stats.vectors_written = self.store.replace_all(&vectors)?;
        self.store.put_reviews(records)?;

        info!(
            seen = stats.records_seen,
            written = stats.vectors_written,
            skipped = stats.skipped,
            errors = stats.errors,
            "Vectorization complete"
        );

        Ok(stats)
    }

    /// Embed one chunk, falling back to per-record embedding if the batch
    /// call fails, so a single bad input only costs itself.
    fn embed_chunk(
        &self,
        chunk: &[&ReviewRecord],
        vectors: &mut Vec<(String, Embedding)>,
        stats: &mut VectorizeStats,
    ) {
        let texts: Vec<&str> = chunk.iter().map(|r| r.cleaned_review_text.as_str()).collect();

        match self.embedder.embed_batch(&texts) {
            Ok(embeddings) => {
                for (record, embedding) in chunk.iter().zip(embeddings) {
                    vectors.push((record.review_id.clone(), embedding));
                }
            }
            Err(e) => {
                warn!(error = %e, "Batch embedding failed, retrying records individually");
                for record in chunk {
                    match self.embedder.embed(&record.cleaned_review_text) {
                        Ok(embedding) => vectors.push((record.review_id.clone(), embedding)),
                        Err(e) => {
                            warn!(review_id = %record.review_id, error = %e, "Failed to embed record");
                            stats.errors += 1;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_embeddings::{EmbeddingError, ModelInfo};
    use tempfile::TempDir;

    /// Deterministic embedder: maps text length and first byte into a small
    /// vector. Fails on any text containing "poison".
    struct MockEmbedder {
        info: ModelInfo,
    }

    impl MockEmbedder {
        fn new() -> Self {
            Self {
                info: ModelInfo {
                    name: "mock".to_string(),
                    dimension: 3,
                    max_sequence_length: 16,
                },
            }
        }
    }

    impl EmbeddingModel for MockEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            if text.contains("poison") {
                return Err(EmbeddingError::InvalidInput(text.to_string()));
            }
            let first = f64::from(text.as_bytes().first().copied().unwrap_or(0));
            Ok(Embedding::new(vec![text.len() as f64, first, 1.0]))
        }
    }

    fn record(id: &str, cleaned: &str) -> ReviewRecord {
        ReviewRecord {
            review_id: id.to_string(),
            review_text: cleaned.to_string(),
            rating: 4.0,
            cleaned_review_text: cleaned.to_string(),
            sentiment_score: None,
            normalized_rating: 0.75,
        }
    }

    fn pipeline(temp: &TempDir, batch_size: usize) -> (VectorizePipeline<MockEmbedder>, Arc<VectorStore>) {
        let store = Arc::new(VectorStore::open(temp.path()).unwrap());
        let embedder = Arc::new(MockEmbedder::new());
        (
            VectorizePipeline::new(embedder, Arc::clone(&store), batch_size),
            store,
        )
    }

    #[test]
    fn test_run_writes_vectors_and_reviews() {
        let temp = TempDir::new().unwrap();
        let (pipeline, store) = pipeline(&temp, 2);

        let records = vec![record("r1", "great phone"), record("r2", "bad battery")];
        let stats = pipeline.run(&records).unwrap();

        assert_eq!(stats.records_seen, 2);
        assert_eq!(stats.vectors_written, 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(stats.errors, 0);

        assert_eq!(store.vector_count().unwrap(), 2);
        assert_eq!(store.review_count().unwrap(), 2);
    }

    #[test]
    fn test_run_skips_empty_cleaned_text() {
        let temp = TempDir::new().unwrap();
        let (pipeline, store) = pipeline(&temp, 4);

        let records = vec![record("r1", "fine"), record("r2", "   ")];
        let stats = pipeline.run(&records).unwrap();

        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.vectors_written, 1);
        // Review rows are written for every record, vector or not
        assert_eq!(store.review_count().unwrap(), 2);
    }

    #[test]
    fn test_bad_record_does_not_abort_siblings() {
        let temp = TempDir::new().unwrap();
        let (pipeline, store) = pipeline(&temp, 8);

        let records = vec![
            record("ok-1", "solid build"),
            record("bad", "poison text"),
            record("ok-2", "fast shipping"),
        ];
        let stats = pipeline.run(&records).unwrap();

        assert_eq!(stats.errors, 1);
        assert_eq!(stats.vectors_written, 2);

        let corpus = store.load_all().unwrap();
        let ids: Vec<&str> = corpus.iter().map(|(id, _)| id.as_str()).collect();
        assert!(ids.contains(&"ok-1"));
        assert!(ids.contains(&"ok-2"));
        assert!(!ids.contains(&"bad"));
    }

    #[test]
    fn test_run_empty_input() {
        let temp = TempDir::new().unwrap();
        let (pipeline, store) = pipeline(&temp, 4);

        let stats = pipeline.run(&[]).unwrap();
        assert_eq!(stats, VectorizeStats::default());
        assert_eq!(store.vector_count().unwrap(), 0);
    }

    #[test]
    fn test_rerun_replaces_corpus() {
        let temp = TempDir::new().unwrap();
        let (pipeline, store) = pipeline(&temp, 4);

        pipeline
            .run(&[record("old", "first generation")])
            .unwrap();
        pipeline.run(&[record("new", "second generation")]).unwrap();

        let corpus = store.load_all().unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].0, "new");
    }
}
