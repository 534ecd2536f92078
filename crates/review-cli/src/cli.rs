//! CLI argument parsing for review-search.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Review Search
///
/// Embeds product reviews into vectors, stores them, and retrieves the
/// most semantically similar reviews for a free-text query.
#[derive(Parser, Debug)]
#[command(name = "review-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/review-search/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Override vector store path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pipeline commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed preprocessed review records and replace the stored corpus
    Vectorize {
        /// JSON file of preprocessed review records
        #[arg(short, long)]
        input: String,

        /// Override embedding batch size
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Import a vector snapshot file into the store
    ImportVectors {
        /// Snapshot file ([{review_id, embedding}, ...])
        #[arg(short, long)]
        input: String,
    },

    /// Export the stored vectors to a snapshot file
    ExportVectors {
        /// Output snapshot file
        #[arg(short, long)]
        output: String,
    },

    /// Retrieve the reviews most similar to a query
    Query {
        /// Free-text query
        text: String,

        /// Number of results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Print full review text, not just IDs and scores
        #[arg(long)]
        show_text: bool,
    },

    /// Show store contents summary
    Status,
}
