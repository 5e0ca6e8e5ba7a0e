//! # Driving Ports (API - Inbound)
//!
//! The contract the certificate pipeline programs against. It never learns
//! which internal strategy served a call.

use crate::errors::LedgerError;
use async_trait::async_trait;
use cc_01_interface_codec::{CallRequest, Token};
use shared_types::{Address, Hash, Roles, TransactionOutcome, TransactionReceipt};

/// Ledger submission and query API.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Submits a state-changing call as `signer`.
    ///
    /// The typed path is tried first; on any error the call is encoded and
    /// sent raw. Fails with [`LedgerError::SubmissionFailure`] only when
    /// both paths fail. Never retries.
    async fn submit(
        &self,
        signer: Address,
        call: &CallRequest,
    ) -> Result<TransactionOutcome, LedgerError>;

    /// Performs a read-only call and returns its decoded outputs.
    ///
    /// Typed read first, raw `eth_call` + decode as fallback.
    async fn query(&self, call: &CallRequest) -> Result<Vec<Token>, LedgerError>;

    /// Resolves any outcome to a confirmed receipt.
    async fn confirm(&self, outcome: TransactionOutcome) -> Result<TransactionReceipt, LedgerError>;

    /// Deploys contract bytecode as `signer` and waits for the receipt.
    ///
    /// The receipt is guaranteed to carry a contract address.
    async fn deploy(&self, signer: Address, bytecode: &[u8])
        -> Result<TransactionReceipt, LedgerError>;

    /// Input data of a known transaction, if the node has it.
    async fn transaction_input(&self, hash: Hash) -> Result<Option<Vec<u8>>, LedgerError>;
}

/// Discovers the node's signing identities.
#[async_trait]
pub trait SignerDirectory: Send + Sync {
    /// Ordered list of node-managed accounts.
    ///
    /// Fails with [`LedgerError::NoAccountsAvailable`] when it is empty.
    async fn resolve_accounts(&self) -> Result<Vec<Address>, LedgerError>;

    /// Positional role assignment over [`Self::resolve_accounts`].
    async fn resolve_roles(&self) -> Result<Roles, LedgerError> {
        let accounts = self.resolve_accounts().await?;
        Roles::from_accounts(&accounts).ok_or(LedgerError::NoAccountsAvailable)
    }
}
