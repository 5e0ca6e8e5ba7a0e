//! # Pipeline Results

use cc_01_interface_codec::Token;
use serde::Serialize;
use shared_types::{Address, CertificateTuple, Hash, MetadataRecord, Roles, TransactionOutcome};

/// Identities and contract resolved once per pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunContext {
    pub roles: Roles,
    pub contract: Address,
}

/// Result of a successful issuance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceReceipt {
    /// Ledger contract the record was anchored in.
    pub contract: Address,
    /// Hash of the issuing transaction.
    pub tx_hash: Hash,
    /// `count - 1` read after confirmation; `None` when the count read failed.
    ///
    /// Only correct when no other issuer landed a record in between.
    pub record_id: Option<u64>,
    /// Locator returned by the content-distribution service.
    pub content_locator: String,
    /// Keccak-256 of the locator string, anchored on-chain.
    pub content_hash: Hash,
    /// The published record.
    pub metadata: MetadataRecord,
    pub issuer: Address,
    pub subject: Address,
    pub category_code: u8,
    /// Confirmed submission outcome.
    pub outcome: TransactionOutcome,
}

/// What verification resolved a record to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "camelCase")]
pub enum ResolvedRecord {
    /// Metadata found in the local index.
    Metadata(MetadataRecord),
    /// Degraded result: the raw on-chain tuple.
    OnChain(CertificateTuple),
}

impl ResolvedRecord {
    #[must_use]
    pub fn metadata(&self) -> Option<&MetadataRecord> {
        match self {
            Self::Metadata(record) => Some(record),
            Self::OnChain(_) => None,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::OnChain(_))
    }
}

/// Result of verifying one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub record_id: u64,
    /// Record as stored by the ledger.
    pub certificate: CertificateTuple,
    pub resolved: ResolvedRecord,
}

/// A ledger transaction decoded against the contract surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCall {
    /// Function name, e.g. `issueCertificate`.
    pub function: &'static str,
    pub arguments: Vec<Token>,
}
