//! # Test Doubles
//!
//! An in-memory [`ContentPublisher`] and a pipeline assembled entirely from
//! in-memory parts. Enable with `test-utils`.

use crate::config::PipelineConfig;
use crate::errors::UploadError;
use crate::ports::ContentPublisher;
use crate::service::CertificatePipeline;
use async_trait::async_trait;
use cc_02_transaction_submission::testing::InMemoryLedger;
use cc_02_transaction_submission::Submitter;
use cc_03_metadata_store::InMemoryMetadataStore;
use parking_lot::Mutex;
use shared_types::{keccak256, MetadataRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Publisher that keeps uploads in memory.
///
/// Locators are content-addressed, `mem://<keccak of the record JSON>`, so
/// the same record always gets the same locator.
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    uploads: Mutex<Vec<(String, MetadataRecord)>>,
    failing: AtomicBool,
}

impl InMemoryPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following upload fail with a 503 rejection.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Uploads in order, with their locators.
    #[must_use]
    pub fn uploads(&self) -> Vec<(String, MetadataRecord)> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl ContentPublisher for InMemoryPublisher {
    async fn publish(&self, record: &MetadataRecord) -> Result<String, UploadError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(UploadError::Rejected {
                status: 503,
                body: "publisher unavailable".into(),
            });
        }
        let bytes =
            serde_json::to_vec(record).map_err(|e| UploadError::InvalidResponse(e.to_string()))?;
        let locator = format!("mem://{:x}", keccak256(&bytes));
        self.uploads.lock().push((locator.clone(), record.clone()));
        Ok(locator)
    }
}

/// Everything a pipeline test needs to inspect.
pub struct TestHarness {
    pub ledger: Arc<InMemoryLedger>,
    pub store: Arc<InMemoryMetadataStore>,
    pub publisher: Arc<InMemoryPublisher>,
    pub pipeline: CertificatePipeline,
}

impl TestHarness {
    /// Pipeline over `ledger` with the contract address configured as an
    /// override, so no deployment record is needed.
    #[must_use]
    pub fn new(ledger: InMemoryLedger) -> Self {
        let ledger = Arc::new(ledger);
        let mut config = PipelineConfig::default();
        config.contract_address = ledger
            .contract()
            .map(|address| shared_types::address_hex(&address));
        Self::with_config(ledger, config)
    }

    /// Pipeline over an already shared ledger with explicit configuration.
    #[must_use]
    pub fn with_config(ledger: Arc<InMemoryLedger>, config: PipelineConfig) -> Self {
        let submitter = Submitter::new(ledger.clone(), Duration::from_millis(1));
        let signers = submitter.account_resolver();
        let store = Arc::new(InMemoryMetadataStore::new());
        let publisher = Arc::new(InMemoryPublisher::new());
        let pipeline = CertificatePipeline::new(
            Arc::new(submitter),
            Arc::new(signers),
            store.clone(),
            publisher.clone(),
            config,
        );
        Self {
            ledger,
            store,
            publisher,
            pipeline,
        }
    }
}
