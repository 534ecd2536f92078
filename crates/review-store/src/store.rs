//! RocksDB-backed vector store.
//!
//! Two column families:
//! - `embeddings`: review_id -> codec-encoded vector text
//! - `reviews`: review_id -> StoredReview JSON
//!
//! Writes use full-replace semantics: one atomic `WriteBatch` deletes the
//! existing collection and installs the new one, so concurrent readers never
//! observe a partially written corpus.

use std::collections::HashMap;
use std::path::Path;

use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};
use tracing::{debug, info, warn};

use review_embeddings::Embedding;
use review_types::{ReviewRecord, StoredReview};

use crate::codec;
use crate::error::StoreError;

/// Column family for encoded embedding vectors
pub const CF_EMBEDDINGS: &str = "embeddings";

/// Column family for review rows
pub const CF_REVIEWS: &str = "reviews";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_EMBEDDINGS, CF_REVIEWS];

fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    ALL_CF_NAMES
        .iter()
        .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
        .collect()
}

/// Persistent store for (review_id, vector) pairs and their review rows.
pub struct VectorStore {
    db: DB,
}

impl VectorStore {
    /// Open the store at the given path, creating it if necessary.
    ///
    /// An unreachable or unopenable backing store is reported as
    /// [`StoreError::Unavailable`].
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!("Opening vector store at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let db = DB::open_cf_descriptors(&db_opts, path, build_cf_descriptors())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { db })
    }

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::ColumnFamilyNotFound(name.to_string()))
    }

    /// Atomically replace the entire vector collection.
    ///
    /// All-or-nothing: validation happens before any write, and the delete of
    /// the old collection plus the install of the new one commit in a single
    /// WriteBatch. Duplicate review_ids within the batch are last-write-wins.
    ///
    /// Every vector must share one dimension; a mismatch against the batch's
    /// established dimension fails the whole call with
    /// [`StoreError::DimensionMismatch`] and leaves the previous collection
    /// intact.
    ///
    /// Returns the number of distinct vectors written.
    pub fn replace_all(&self, vectors: &[(String, Embedding)]) -> Result<usize, StoreError> {
        // Validate dimensions and dedup (last-write-wins) before touching the DB
        let mut expected_dim: Option<usize> = None;
        let mut encoded: HashMap<&str, String> = HashMap::new();
        for (review_id, embedding) in vectors {
            let dim = embedding.dimension();
            match expected_dim {
                None => expected_dim = Some(dim),
                Some(expected) if expected != dim => {
                    return Err(StoreError::DimensionMismatch {
                        expected,
                        actual: dim,
                    });
                }
                Some(_) => {}
            }
            encoded.insert(review_id.as_str(), codec::encode(&embedding.values)?);
        }

        let cf = self.cf_handle(CF_EMBEDDINGS)?;

        let mut batch = WriteBatch::default();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (key, _) = item?;
            batch.delete_cf(cf, key);
        }
        for (review_id, text) in &encoded {
            batch.put_cf(cf, review_id.as_bytes(), text.as_bytes());
        }

        self.db.write(batch)?;

        info!(count = encoded.len(), "Replaced vector collection");
        Ok(encoded.len())
    }

    /// Load every stored vector.
    ///
    /// Rows whose encoded text cannot be decoded are logged with their
    /// review_id and skipped; they never abort the load. Order is the store's
    /// key order, which is stable across calls.
    pub fn load_all(&self) -> Result<Vec<(String, Embedding)>, StoreError> {
        let cf = self.cf_handle(CF_EMBEDDINGS)?;

        let mut corpus = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (key, value) = item?;
            let review_id = String::from_utf8_lossy(&key).to_string();
            let text = String::from_utf8_lossy(&value);

            match codec::decode(&text) {
                Ok(values) => corpus.push((review_id, Embedding::new(values))),
                Err(e) => {
                    warn!(review_id = %review_id, error = %e, "Skipping undecodable vector row");
                }
            }
        }

        debug!(count = corpus.len(), "Loaded vector collection");
        Ok(corpus)
    }

    /// Atomically replace the stored review rows.
    ///
    /// Returns the number of distinct rows written.
    pub fn put_reviews(&self, records: &[ReviewRecord]) -> Result<usize, StoreError> {
        let cf = self.cf_handle(CF_REVIEWS)?;

        let mut rows: HashMap<&str, Vec<u8>> = HashMap::new();
        for record in records {
            let stored = StoredReview::new(record.clone());
            rows.insert(record.review_id.as_str(), serde_json::to_vec(&stored)?);
        }

        let mut batch = WriteBatch::default();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (key, _) = item?;
            batch.delete_cf(cf, key);
        }
        for (review_id, bytes) in &rows {
            batch.put_cf(cf, review_id.as_bytes(), bytes);
        }

        self.db.write(batch)?;

        info!(count = rows.len(), "Replaced review rows");
        Ok(rows.len())
    }

    /// Resolve review IDs to their stored rows, in the order given.
    ///
    /// Unknown IDs are silently omitted: "not stored" is a valid outcome,
    /// not an error.
    pub fn find_by_ids(&self, ids: &[String]) -> Result<Vec<StoredReview>, StoreError> {
        let cf = self.cf_handle(CF_REVIEWS)?;

        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(bytes) = self.db.get_cf(cf, id.as_bytes())? {
                let stored: StoredReview = serde_json::from_slice(&bytes)?;
                found.push(stored);
            } else {
                debug!(review_id = %id, "No stored review for ID");
            }
        }

        Ok(found)
    }

    /// Number of stored vectors.
    pub fn vector_count(&self) -> Result<usize, StoreError> {
        let cf = self.cf_handle(CF_EMBEDDINGS)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Number of stored review rows.
    pub fn review_count(&self) -> Result<usize, StoreError> {
        let cf = self.cf_handle(CF_REVIEWS)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}
