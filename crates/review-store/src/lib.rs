//! # review-store
//!
//! Persistence for review embeddings.
//!
//! - [`codec`]: lossless textual encoding of f64 vectors, with defensive
//!   stripping of tensor-formatting artifacts leaked by upstream tooling
//! - [`store`]: RocksDB-backed store with atomic full-replace write
//!   semantics and tolerant ID lookup
//! - [`snapshot`]: flat-file JSON import/export interchangeable with the
//!   stored collection

pub mod codec;
pub mod error;
pub mod snapshot;
pub mod store;

pub use codec::{decode, encode};
pub use error::StoreError;
pub use snapshot::{read_snapshot, write_snapshot, Snapshot};
pub use store::VectorStore;
