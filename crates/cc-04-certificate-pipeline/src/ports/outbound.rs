//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators owned by this crate. Ledger access and the metadata index
//! come from the submission and store crates.

use crate::errors::UploadError;
use async_trait::async_trait;
use shared_types::MetadataRecord;

/// Content-distribution service.
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Uploads `record` and returns its stable locator (e.g. `ipfs://…`).
    ///
    /// The locator string is what gets hashed and anchored, so it must be
    /// returned exactly as later readers will see it.
    async fn publish(&self, record: &MetadataRecord) -> Result<String, UploadError>;
}
