//! # Error Types

use thiserror::Error;

/// Errors from the metadata store.
///
/// Callers treat these as soft failures: metadata is a display convenience
/// over the ledger's authoritative state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The index could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}
