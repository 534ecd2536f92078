//! Review record file loading.
//!
//! The preprocessing stage hands off a JSON array of review records with
//! `cleaned_review_text` populated; this is the pipeline's only input format.

use std::path::Path;

use tracing::info;

use review_types::ReviewRecord;

use crate::error::IndexError;

/// Load preprocessed review records from a JSON array file.
pub fn load_records(path: &Path) -> Result<Vec<ReviewRecord>, IndexError> {
    info!("Loading review records from {:?}", path);

    let text = std::fs::read_to_string(path)?;
    let records: Vec<ReviewRecord> = serde_json::from_str(&text)
        .map_err(|e| IndexError::Records(format!("{}: {}", path.display(), e)))?;

    info!(count = records.len(), "Records loaded");
    Ok(records)
}
