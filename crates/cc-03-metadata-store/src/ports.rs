//! # Store Port
//!
//! Narrow get/put contract so the backing store can be swapped for a
//! transactional engine without touching callers.

use crate::errors::StoreError;
use async_trait::async_trait;
use shared_types::{Hash, MetadataRecord};

/// Result of a `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// A new entry was written.
    Inserted,
    /// An entry for the hash already existed and was left untouched.
    AlreadyPresent,
}

/// Content-hash keyed metadata index.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Looks up the record for `hash`. A missing or unreadable index reads
    /// as empty.
    async fn get(&self, hash: &Hash) -> Result<Option<MetadataRecord>, StoreError>;

    /// Records `hash -> record`. Existing entries are never overwritten:
    /// identical hashes mean identical content.
    async fn put(&self, hash: &Hash, record: &MetadataRecord) -> Result<PutOutcome, StoreError>;
}
