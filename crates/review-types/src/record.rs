//! Review record types.
//!
//! `ReviewRecord` is produced by the upstream preprocessing stage and is
//! read-only to everything downstream. `StoredReview` is the row shape the
//! store persists next to the review's embedding vector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A preprocessed product review.
///
/// The embedding pipeline consumes exactly `cleaned_review_text`; the other
/// enrichment fields are carried through for downstream consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewRecord {
    /// Unique review identifier (assigned upstream)
    pub review_id: String,
    /// Original review text
    pub review_text: String,
    /// Star rating as given by the reviewer
    pub rating: f64,
    /// Cleaned text, populated by the preprocessing stage
    pub cleaned_review_text: String,
    /// Sentiment polarity in [-1, 1], if the preprocessing stage computed one
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    /// Rating scaled into [0, 1]
    pub normalized_rating: f64,
}

impl ReviewRecord {
    /// Whether this record has any text worth embedding.
    pub fn has_embeddable_text(&self) -> bool {
        !self.cleaned_review_text.trim().is_empty()
    }
}

/// A review row as persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredReview {
    /// The review fields, unchanged from ingestion
    #[serde(flatten)]
    pub record: ReviewRecord,
    /// When this row entered the store
    pub ingested_at: DateTime<Utc>,
}

impl StoredReview {
    /// Wrap a record with the current ingestion timestamp.
    pub fn new(record: ReviewRecord) -> Self {
        Self {
            record,
            ingested_at: Utc::now(),
        }
    }

    pub fn review_id(&self) -> &str {
        &self.record.review_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ReviewRecord {
        ReviewRecord {
            review_id: "r-001".to_string(),
            review_text: "Great battery life!".to_string(),
            rating: 5.0,
            cleaned_review_text: "great battery life".to_string(),
            sentiment_score: Some(0.8),
            normalized_rating: 1.0,
        }
    }

    #[test]
    fn test_record_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let decoded: ReviewRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_sentiment_score_optional() {
        let json = r#"{
            "review_id": "r-002",
            "review_text": "ok",
            "rating": 3,
            "cleaned_review_text": "ok",
            "normalized_rating": 0.5
        }"#;
        let decoded: ReviewRecord = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.sentiment_score, None);
    }

    #[test]
    fn test_has_embeddable_text() {
        let mut record = sample_record();
        assert!(record.has_embeddable_text());
        record.cleaned_review_text = "   ".to_string();
        assert!(!record.has_embeddable_text());
    }

    #[test]
    fn test_stored_review_flattens_record() {
        let stored = StoredReview::new(sample_record());
        let json = serde_json::to_value(&stored).unwrap();
        // Record fields sit at the top level next to ingested_at
        assert_eq!(json["review_id"], "r-001");
        assert!(json["ingested_at"].is_string());
    }
}
