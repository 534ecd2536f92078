//! Command implementations for the review-search CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use review_embeddings::{ModelCache, SentenceEmbedder};
use review_index::{load_records, VectorizePipeline};
use review_retrieval::QueryEngine;
use review_store::{read_snapshot, write_snapshot, VectorStore};
use review_types::Settings;

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    db_path_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if let Some(db_path) = db_path_override {
        settings.db_path = db_path.to_string();
    }

    Ok(settings)
}

/// Initialize tracing from settings; RUST_LOG wins when set.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn open_store(settings: &Settings) -> Result<Arc<VectorStore>> {
    let db_path = settings.expanded_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create store directory")?;
    }
    let store = VectorStore::open(&db_path).context("Failed to open vector store")?;
    Ok(Arc::new(store))
}

fn load_embedder(settings: &Settings) -> Result<Arc<SentenceEmbedder>> {
    let cache = ModelCache::from_settings(&settings.model);
    let embedder = SentenceEmbedder::load(&cache).context("Failed to load embedding model")?;
    Ok(Arc::new(embedder))
}

/// Embed a records file and replace the stored corpus.
pub fn vectorize(settings: &Settings, input: &str, batch_size: Option<usize>) -> Result<()> {
    let records = load_records(Path::new(input)).context("Failed to load review records")?;

    let store = open_store(settings)?;
    let embedder = load_embedder(settings)?;

    let pipeline = VectorizePipeline::new(
        embedder,
        store,
        batch_size.unwrap_or(settings.batch_size),
    );
    let stats = pipeline.run(&records).context("Vectorization failed")?;

    println!(
        "Vectorized {} of {} records ({} skipped, {} errors)",
        stats.vectors_written, stats.records_seen, stats.skipped, stats.errors
    );
    Ok(())
}

/// Import a snapshot file into the store.
pub fn import_vectors(settings: &Settings, input: &str) -> Result<()> {
    let snapshot = read_snapshot(Path::new(input)).context("Failed to read snapshot")?;

    let store = open_store(settings)?;
    let count = store
        .replace_all(&snapshot.vectors)
        .context("Failed to replace vector collection")?;

    println!(
        "Imported {} vectors ({} entries skipped)",
        count, snapshot.skipped
    );
    Ok(())
}

/// Export the stored vectors to a snapshot file.
pub fn export_vectors(settings: &Settings, output: &str) -> Result<()> {
    let store = open_store(settings)?;
    let vectors = store.load_all().context("Failed to load vectors")?;

    write_snapshot(Path::new(output), &vectors).context("Failed to write snapshot")?;

    println!("Exported {} vectors to {}", vectors.len(), output);
    Ok(())
}

/// Retrieve and print the reviews most similar to the query.
pub fn query(settings: &Settings, text: &str, top_k: Option<usize>, show_text: bool) -> Result<()> {
    let store = open_store(settings)?;
    let embedder = load_embedder(settings)?;

    let engine = QueryEngine::new(embedder, store);
    let k = top_k.unwrap_or(settings.top_k);

    let results = engine.retrieve(text, k).context("Retrieval failed")?;

    if results.is_empty() {
        println!("No similar reviews found.");
        return Ok(());
    }

    info!(count = results.len(), "Printing results");
    for (rank, result) in results.iter().enumerate() {
        if show_text {
            println!(
                "{:>2}. [{:.4}] {} - {}",
                rank + 1,
                result.score,
                result.review.review_id(),
                result.review.record.review_text
            );
        } else {
            println!(
                "{:>2}. [{:.4}] {}",
                rank + 1,
                result.score,
                result.review.review_id()
            );
        }
    }
    Ok(())
}

/// Print a summary of the store contents.
pub fn status(settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;

    let vectors = store.vector_count().context("Failed to count vectors")?;
    let reviews = store.review_count().context("Failed to count reviews")?;

    println!("Store: {}", settings.expanded_db_path().display());
    println!("  Vectors: {}", vectors);
    println!("  Reviews: {}", reviews);
    Ok(())
}
