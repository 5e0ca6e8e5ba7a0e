//! # Error Types
//!
//! Errors raised while talking to the ledger node.

use cc_01_interface_codec::CodecError;
use shared_types::Hash;
use thiserror::Error;

/// Errors from ledger submission and queries.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The node could not be reached or the HTTP exchange failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered with a result this client cannot interpret.
    #[error("invalid response to {method}: {reason}")]
    InvalidResponse { method: String, reason: String },

    /// The typed call capability is absent or cannot serve this call.
    #[error("typed contract call unavailable: {0}")]
    Unsupported(String),

    /// The node manages no signing accounts.
    #[error("no accounts available on the connected node")]
    NoAccountsAvailable,

    /// Call-data could not be built or return data could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Transaction was included but its execution reverted.
    #[error("transaction {hash:?} reverted")]
    Reverted { hash: Hash },

    /// Contract-creation receipt carries no contract address.
    #[error("receipt for {hash:?} has no contract address")]
    MissingContractAddress { hash: Hash },

    /// A signed transaction could not be produced or parsed.
    #[error("signing error: {0}")]
    Signing(String),

    /// A typed transaction was broadcast but never confirmed.
    #[error("transaction {hash:?} broadcast but unconfirmed: {cause}")]
    Unconfirmed { hash: Hash, cause: Box<LedgerError> },

    /// Both the preferred and the fallback path failed.
    ///
    /// `broadcast` is the hash the preferred path already sent, if any.
    #[error("submission failed on both paths (preferred: {preferred}; fallback: {fallback})")]
    SubmissionFailure {
        preferred: String,
        broadcast: Option<Hash>,
        fallback: Box<LedgerError>,
    },
}

impl LedgerError {
    pub(crate) fn invalid(method: &str, reason: impl ToString) -> Self {
        Self::InvalidResponse {
            method: method.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Hash of a transaction already sent before this failure.
    #[must_use]
    pub fn broadcast_hash(&self) -> Option<Hash> {
        match self {
            Self::Unconfirmed { hash, .. } => Some(*hash),
            Self::SubmissionFailure { broadcast, .. } => *broadcast,
            _ => None,
        }
    }

    /// Codec error carried by this failure, looking through a fallback.
    #[must_use]
    pub fn codec(&self) -> Option<&CodecError> {
        match self {
            Self::Codec(err) => Some(err),
            Self::SubmissionFailure { fallback, .. } => fallback.codec(),
            _ => None,
        }
    }
}
