//! # CC-02 Transaction Submission - Ledger Access
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Sends certificate-contract calls to the ledger node and reads contract
//! state back. Also discovers the node's signing identities and assigns
//! roles by position.
//!
//! ## Dual-Path Submission
//!
//! | Path | Mechanism | Used when |
//! |------|-----------|-----------|
//! | Preferred | [`ports::TypedContract`] (e.g. [`adapters::WalletContract`]) | capability installed and able to serve the call |
//! | Fallback | [`domain::raw::RawCallStrategy`]: encode, `eth_sendTransaction`, poll receipt | any error on the preferred path |
//!
//! Both paths yield a [`shared_types::TransactionOutcome`]. Neither path is
//! retried: when both fail the caller receives
//! [`LedgerError::SubmissionFailure`] carrying both causes.
//!
//! ## Role Assignment
//!
//! | Index | Role | Fallback |
//! |-------|------|----------|
//! | 0 | admin / deployer | - |
//! | 1 | issuing authority | index 0 |
//! | 2 | credential subject | index 0 |
//!
//! ## Usage Example
//!
//! ```ignore
//! use cc_02_transaction_submission::prelude::*;
//!
//! let submitter = Submitter::from_config(&SubmitterConfig::default())?;
//! let roles = submitter.account_resolver().resolve_roles().await?;
//! let outcome = submitter.submit(roles.issuer, &call).await?;
//! let receipt = submitter.confirm(outcome).await?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{HttpTransport, LocalWallet, WalletContract};
    pub use crate::client::{NodeClient, TransactionRequest};
    pub use crate::config::{ConfigError, SubmitterConfig};
    pub use crate::domain::accounts::AccountResolver;
    pub use crate::domain::confirm::ReceiptPoller;
    pub use crate::domain::raw::RawCallStrategy;
    pub use crate::errors::LedgerError;
    pub use crate::ports::{
        Confirmation, JsonRpcTransport, SignerDirectory, TransactionSubmitter, TypedContract,
        TypedInvocation,
    };
    pub use crate::service::Submitter;
}

pub use errors::LedgerError;
pub use ports::{SignerDirectory, TransactionSubmitter};
pub use service::Submitter;

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 2;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Transaction Submission";
