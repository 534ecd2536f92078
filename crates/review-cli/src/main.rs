//! Review Search
//!
//! Embeds product reviews, stores the vectors, and retrieves semantically
//! similar reviews for a free-text query.
//!
//! # Usage
//!
//! ```bash
//! review-search vectorize --input reviews.json
//! review-search query "battery problems" -k 5 --show-text
//! review-search import-vectors --input vector_store.json
//! review-search status
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/review-search/config.toml)
//! 3. Environment variables (REVIEW_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use review_cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = commands::load_settings(
        cli.config.as_deref(),
        cli.log_level.as_deref(),
        cli.db_path.as_deref(),
    )?;
    commands::init_logging(&settings)?;

    match cli.command {
        Commands::Vectorize { input, batch_size } => {
            commands::vectorize(&settings, &input, batch_size)?;
        }
        Commands::ImportVectors { input } => {
            commands::import_vectors(&settings, &input)?;
        }
        Commands::ExportVectors { output } => {
            commands::export_vectors(&settings, &output)?;
        }
        Commands::Query {
            text,
            top_k,
            show_text,
        } => {
            commands::query(&settings, &text, top_k, show_text)?;
        }
        Commands::Status => {
            commands::status(&settings)?;
        }
    }

    Ok(())
}
