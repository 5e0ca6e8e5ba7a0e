//! # Node Runtime Library
//!
//! Configuration and wiring for the `cert-chain` binary, exposed for tests.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging
//! 3. Build the submitter (HTTP transport, optional local wallet)
//! 4. Build the metadata index, publisher and pipeline
//! 5. Run the requested command

#![warn(clippy::all)]

pub mod config;
pub mod logging;

use cc_02_transaction_submission::Submitter;
use cc_03_metadata_store::JsonFileStore;
use cc_04_certificate_pipeline::adapters::PinataPublisher;
use cc_04_certificate_pipeline::CertificatePipeline;
use cc_05_api_gateway::ApiGatewayService;
use std::sync::Arc;
use tracing::{info, warn};

pub use config::{ConfigError, NodeConfig};

/// Startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("ledger setup failed: {0}")]
    Ledger(#[from] cc_02_transaction_submission::LedgerError),
    #[error("gateway setup failed: {0}")]
    Gateway(#[from] cc_05_api_gateway::GatewayError),
}

/// Wires the production pipeline from configuration.
pub fn build_pipeline(config: &NodeConfig) -> Result<CertificatePipeline, StartupError> {
    let submitter = Submitter::from_config(&config.submitter)?;
    let signers = submitter.account_resolver();
    info!(
        rpc = %config.submitter.rpc_url,
        typed_path = submitter.has_typed_path(),
        "[node] Ledger submitter ready"
    );

    let store = JsonFileStore::new(&config.pipeline.metadata_index_path);
    let publisher = PinataPublisher::from_config(&config.pipeline.publisher);
    if !publisher.has_credentials() {
        warn!("[node] PINATA_API_KEY/PINATA_SECRET not set; issuance will fail at upload");
    }

    Ok(CertificatePipeline::new(
        Arc::new(submitter),
        Arc::new(signers),
        Arc::new(store),
        Arc::new(publisher),
        config.pipeline.clone(),
    ))
}

/// Wires the HTTP facade around a pipeline.
pub fn build_gateway(
    config: &NodeConfig,
    pipeline: CertificatePipeline,
) -> Result<ApiGatewayService, StartupError> {
    Ok(ApiGatewayService::new(
        config.gateway.clone(),
        Arc::new(pipeline),
    )?)
}
