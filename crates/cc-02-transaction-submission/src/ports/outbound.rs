//! # Driven Ports (SPI - Outbound)
//!
//! What the submitter needs from the outside world:
//! - A JSON-RPC transport to the ledger node
//! - Optionally, a typed contract-call capability (the preferred path)

use crate::errors::LedgerError;
use async_trait::async_trait;
use cc_01_interface_codec::{CallRequest, Token};
use serde_json::Value;
use shared_types::{Address, Hash, TransactionReceipt};

// =============================================================================
// JSON-RPC TRANSPORT
// =============================================================================

/// Raw JSON-RPC access to a ledger node.
///
/// Implementations return the `result` member verbatim, including `null`
/// (e.g. a receipt that is not available yet). A JSON-RPC `error` member
/// maps to [`LedgerError::Rpc`].
#[async_trait]
pub trait JsonRpcTransport: Send + Sync {
    /// Issues one request and returns its `result`.
    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError>;
}

// =============================================================================
// TYPED CONTRACT CAPABILITY
// =============================================================================

/// A runtime-provided contract-call abstraction.
///
/// When the runtime has one, the submitter tries it first. Any error it
/// returns, including [`LedgerError::Unsupported`] for calls it cannot
/// serve, sends the submitter down the raw fallback path.
#[async_trait]
pub trait TypedContract: Send + Sync {
    /// Invokes a state-changing method on `call.target` as `signer`.
    async fn invoke(&self, signer: Address, call: &CallRequest)
        -> Result<TypedInvocation, LedgerError>;

    /// Invokes a read-only method and returns its decoded outputs.
    async fn read(&self, call: &CallRequest) -> Result<Vec<Token>, LedgerError>;

    /// Sends a contract-creation transaction as `signer`.
    async fn deploy(&self, signer: Address, bytecode: &[u8])
        -> Result<TypedInvocation, LedgerError>;
}

/// Result of a typed invocation: the broadcast hash and, when the runtime
/// exposes one, a handle that waits for inclusion.
pub struct TypedInvocation {
    /// Transaction hash.
    pub hash: Hash,
    /// Wait-for-confirmation handle, if available.
    pub confirmation: Option<Box<dyn Confirmation>>,
}

impl std::fmt::Debug for TypedInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedInvocation")
            .field("hash", &self.hash)
            .field("confirmation", &self.confirmation.is_some())
            .finish()
    }
}

/// Waits for a broadcast transaction to be included.
#[async_trait]
pub trait Confirmation: Send {
    /// Resolves to the receipt once the transaction is included.
    async fn wait(self: Box<Self>) -> Result<TransactionReceipt, LedgerError>;
}
