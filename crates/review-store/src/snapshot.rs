//! Flat-file snapshots of the vector collection.
//!
//! The interchange format is a JSON array:
//! `[{"review_id": "...", "embedding": [0.1, ...]}, ...]`
//!
//! Embedding elements read from a snapshot may be plain numbers or
//! wrapper-polluted strings; the codec's cleanup applies on import. Entries
//! that still fail to parse are logged with their review_id and excluded;
//! one bad entry never aborts the import.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use review_embeddings::Embedding;

use crate::codec::clean_element;
use crate::error::StoreError;

#[derive(Debug, Deserialize)]
struct RawEntry {
    review_id: String,
    embedding: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct CleanEntry<'a> {
    review_id: &'a str,
    embedding: &'a [f64],
}

/// Result of a snapshot import.
#[derive(Debug)]
pub struct Snapshot {
    /// Successfully cleaned vectors, in file order
    pub vectors: Vec<(String, Embedding)>,
    /// Number of entries excluded because their embedding failed cleanup
    pub skipped: usize,
}

/// Read a snapshot file, cleaning each embedding through the codec.
///
/// A file that is not a JSON array of `{review_id, embedding}` objects fails
/// the whole read; a single entry whose embedding is unparseable is skipped.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    info!("Loading vector snapshot from {:?}", path);

    let text = std::fs::read_to_string(path)?;
    let entries: Vec<RawEntry> = serde_json::from_str(&text)
        .map_err(|e| StoreError::Serialization(format!("snapshot format: {}", e)))?;

    let mut vectors = Vec::with_capacity(entries.len());
    let mut skipped = 0;

    for entry in entries {
        let cleaned: Result<Vec<f64>, StoreError> =
            entry.embedding.iter().map(clean_element).collect();
        match cleaned {
            Ok(values) => vectors.push((entry.review_id, Embedding::new(values))),
            Err(e) => {
                warn!(review_id = %entry.review_id, error = %e, "Skipping snapshot entry");
                skipped += 1;
            }
        }
    }

    info!(
        loaded = vectors.len(),
        skipped = skipped,
        "Snapshot loaded"
    );

    Ok(Snapshot { vectors, skipped })
}

/// Write the vector collection to a snapshot file.
pub fn write_snapshot(path: &Path, vectors: &[(String, Embedding)]) -> Result<(), StoreError> {
    let entries: Vec<CleanEntry> = vectors
        .iter()
        .map(|(review_id, embedding)| CleanEntry {
            review_id,
            embedding: &embedding.values,
        })
        .collect();

    let text = serde_json::to_string(&entries)?;
    std::fs::write(path, text)?;

    info!(count = vectors.len(), "Snapshot written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_snapshot_cleans_wrapped_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vector_store.json");
        std::fs::write(
            &path,
            r#"[
                {"review_id": "r1", "embedding": ["tensor(0.5)", "tensor(-0.25)"]},
                {"review_id": "r2", "embedding": [0.125, 0.25]}
            ]"#,
        )
        .unwrap();

        let snapshot = read_snapshot(&path).unwrap();
        assert_eq!(snapshot.skipped, 0);
        assert_eq!(snapshot.vectors.len(), 2);
        assert_eq!(snapshot.vectors[0].0, "r1");
        assert_eq!(snapshot.vectors[0].1.values, vec![0.5, -0.25]);
        assert_eq!(snapshot.vectors[1].1.values, vec![0.125, 0.25]);
    }

    #[test]
    fn test_read_snapshot_skips_bad_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vector_store.json");
        std::fs::write(
            &path,
            r#"[
                {"review_id": "good", "embedding": [1.0]},
                {"review_id": "bad", "embedding": ["tensor(oops)"]}
            ]"#,
        )
        .unwrap();

        let snapshot = read_snapshot(&path).unwrap();
        assert_eq!(snapshot.skipped, 1);
        assert_eq!(snapshot.vectors.len(), 1);
        assert_eq!(snapshot.vectors[0].0, "good");
    }

    #[test]
    fn test_read_snapshot_rejects_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vector_store.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        let result = read_snapshot(&path);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");

        let vectors = vec![
            ("a".to_string(), Embedding::new(vec![0.1, -0.2, 1e-15])),
            ("b".to_string(), Embedding::new(vec![3.0, 4.0, 5.0])),
        ];
        write_snapshot(&path, &vectors).unwrap();

        let snapshot = read_snapshot(&path).unwrap();
        assert_eq!(snapshot.skipped, 0);
        assert_eq!(snapshot.vectors, vectors);
    }
}
