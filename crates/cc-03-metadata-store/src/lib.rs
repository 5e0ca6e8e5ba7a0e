//! # CC-03 Metadata Store - Content-Hash Index
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Persists the human-readable record behind each anchored content hash and
//! looks it up on verification.
//!
//! ## Consistency Window
//!
//! The index is written before the ledger transaction confirms and nothing
//! coordinates the two stores:
//!
//! | Failure | Result |
//! |---------|--------|
//! | ledger write fails after index write | orphaned index entry |
//! | index write fails after ledger write | on-chain record without metadata |
//! | two writers race on the file | one writer's entry is lost |
//!
//! Verification tolerates the missing-entry cases by returning the raw
//! on-chain record.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod errors;
pub mod ports;

pub use adapters::{InMemoryMetadataStore, JsonFileStore};
pub use errors::StoreError;
pub use ports::{MetadataStore, PutOutcome};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 3;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Metadata Store";
