//! Review Search CLI library.
//!
//! Exposes the argument types and command handlers so they can be exercised
//! from tests as well as the binary.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    export_vectors, import_vectors, init_logging, load_settings, query, status, vectorize,
};
