//! In-memory metadata index.

use crate::errors::StoreError;
use crate::ports::{MetadataStore, PutOutcome};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{hash_key, Hash, MetadataRecord};
use std::collections::HashMap;

/// Process-local store. Lost on exit; useful for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    entries: RwLock<HashMap<String, MetadataRecord>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes an entry, simulating a lost or never-written index update.
    pub fn forget(&self, hash: &Hash) -> Option<MetadataRecord> {
        self.entries.write().remove(&hash_key(hash))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn get(&self, hash: &Hash) -> Result<Option<MetadataRecord>, StoreError> {
        Ok(self.entries.read().get(&hash_key(hash)).cloned())
    }

    async fn put(&self, hash: &Hash, record: &MetadataRecord) -> Result<PutOutcome, StoreError> {
        let mut entries = self.entries.write();
        let key = hash_key(hash);
        if entries.contains_key(&key) {
            return Ok(PutOutcome::AlreadyPresent);
        }
        entries.insert(key, record.clone());
        Ok(PutOutcome::Inserted)
    }
}
