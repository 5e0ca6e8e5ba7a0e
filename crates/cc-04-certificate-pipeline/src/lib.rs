//! # CC-04 Certificate Pipeline - Issuance and Verification
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Turns a certificate request into a published metadata record, an index
//! entry and an on-chain commitment, and resolves on-chain records back to
//! their metadata.
//!
//! ## Operations
//!
//! | Operation | Signer | Ledger calls |
//! |-----------|--------|--------------|
//! | `issue` | issuer | `issueCertificate`, `totalCertificates` |
//! | `verify` | none | `totalCertificates` (no id), `verifyCertificate` |
//! | `authorize_issuer` | admin | `verifyOrganization` |
//! | `deploy` | admin | contract creation |
//! | `decode_transaction` | none | `eth_getTransactionByHash` |
//!
//! ## Content Commitment
//!
//! The anchored hash is `keccak256(locator)`, the hash of the locator string
//! returned by the publisher, not of the record bytes.
//!
//! ## Record Ids
//!
//! Issuance reports `totalCertificates - 1` read after confirmation. Another
//! issuer landing a record between confirmation and the read shifts that
//! value; the id is advisory.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod config;
pub mod deployment;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// =============================================================================
// PRELUDE
// =============================================================================

pub mod prelude {
    pub use crate::adapters::PinataPublisher;
    pub use crate::config::{ConfigError, IssueDefaults, PipelineConfig, PublisherConfig};
    pub use crate::deployment::{load_bytecode, resolve_contract_address, save_deployment};
    pub use crate::domain::outcome::{
        DecodedCall, IssuanceReceipt, ResolvedRecord, RunContext, Verification,
    };
    pub use crate::domain::request::{IssueRequest, NormalizedIssue};
    pub use crate::errors::{PipelineError, UploadError};
    pub use crate::ports::ContentPublisher;
    pub use crate::service::{deploy_contract, CertificatePipeline};
}

pub use errors::{PipelineError, UploadError};
pub use service::CertificatePipeline;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 4;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Certificate Pipeline";
