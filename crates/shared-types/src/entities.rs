//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Ledger**: `TransactionReceipt`, `TransactionOutcome`, `CertificateTuple`
//! - **Identity**: `Roles`
//! - **Metadata**: `MetadataRecord`, `Attribute`
//! - **Deployment**: `DeploymentRecord`

use crate::primitives::{Address, Hash, U64};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// CLUSTER A: LEDGER
// =============================================================================

/// Confirmation data returned once a transaction is included by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Hash of the confirmed transaction.
    pub transaction_hash: Hash,
    /// Block the transaction was included in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U64>,
    /// Execution status (`1` success, `0` reverted). Absent on pre-Byzantium nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<U64>,
    /// Address of the created contract, for contract-creation transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    /// Sender of the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
}

impl TransactionReceipt {
    /// Receipt for a transaction that executed successfully.
    #[must_use]
    pub fn success(transaction_hash: Hash) -> Self {
        Self {
            transaction_hash,
            block_number: None,
            status: Some(U64::one()),
            contract_address: None,
            from: None,
        }
    }

    /// Returns false only when the node reports a reverted execution.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |status| !status.is_zero())
    }
}

/// Result of submitting a state-changing call.
///
/// Both submission paths produce a hash; only a confirmed outcome carries the
/// receipt. Callers that read derived state must first resolve a pending
/// outcome to a confirmed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TransactionOutcome {
    /// Broadcast, not yet known to be included.
    Pending {
        /// Transaction hash.
        hash: Hash,
    },
    /// Included and executed.
    Confirmed {
        /// Receipt returned by the node.
        receipt: TransactionReceipt,
    },
}

impl TransactionOutcome {
    /// Transaction hash regardless of confirmation state.
    #[must_use]
    pub fn hash(&self) -> Hash {
        match self {
            Self::Pending { hash } => *hash,
            Self::Confirmed { receipt } => receipt.transaction_hash,
        }
    }

    /// Receipt, when confirmed.
    #[must_use]
    pub fn receipt(&self) -> Option<&TransactionReceipt> {
        match self {
            Self::Pending { .. } => None,
            Self::Confirmed { receipt } => Some(receipt),
        }
    }

    /// True once the receipt is known.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// A certificate as stored by the ledger contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateTuple {
    /// Authority that issued the certificate.
    pub issuer: Address,
    /// Credential subject.
    pub subject: Address,
    /// Category code anchored alongside the hash.
    pub category: u8,
    /// Content hash of the metadata locator.
    pub content_hash: Hash,
}

// =============================================================================
// CLUSTER B: IDENTITY
// =============================================================================

/// Signing identities assigned from the node's managed accounts.
///
/// Produced once per pipeline run and threaded through every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    /// Deployer and contract administrator (account 0).
    pub admin: Address,
    /// Issuing authority (account 1, falls back to account 0).
    pub issuer: Address,
    /// Default credential subject (account 2, falls back to account 0).
    pub subject: Address,
}

impl Roles {
    /// Assigns roles by position. Returns `None` for an empty account list.
    ///
    /// Missing positions fall back to the first account so that a
    /// single-account development node stays usable.
    #[must_use]
    pub fn from_accounts(accounts: &[Address]) -> Option<Self> {
        let admin = *accounts.first()?;
        Some(Self {
            admin,
            issuer: accounts.get(1).copied().unwrap_or(admin),
            subject: accounts.get(2).copied().unwrap_or(admin),
        })
    }
}

// =============================================================================
// CLUSTER C: METADATA
// =============================================================================

/// One display attribute of a certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute label, e.g. `"Full Name"`.
    pub trait_type: String,
    /// Display value.
    pub value: Value,
}

impl Attribute {
    /// Creates a string-valued attribute.
    pub fn text(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: Value::String(value.into()),
        }
    }
}

/// Human-readable content behind an anchored hash.
///
/// Stored as an open JSON object so that caller-supplied structured records
/// pass through unchanged, including keys this crate does not know about.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord(Map<String, Value>);

impl MetadataRecord {
    /// Builds a record from a name, description and attribute list.
    #[must_use]
    pub fn new(name: &str, description: &str, attributes: Vec<Attribute>) -> Self {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::String(name.into()));
        fields.insert("description".into(), Value::String(description.into()));
        fields.insert(
            "attributes".into(),
            Value::Array(
                attributes
                    .into_iter()
                    .map(|attr| {
                        serde_json::json!({ "trait_type": attr.trait_type, "value": attr.value })
                    })
                    .collect(),
            ),
        );
        Self(fields)
    }

    /// Accepts an already structured record: an object with a non-empty
    /// `name` and an `attributes` array.
    #[must_use]
    pub fn from_structured(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let has_name = fields
            .get("name")
            .is_some_and(|name| !name.is_null() && name.as_str() != Some(""));
        let has_attributes = fields.get("attributes").is_some_and(Value::is_array);
        (has_name && has_attributes).then(|| Self(fields.clone()))
    }

    /// Record name, when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Value of the first attribute with the given `trait_type`.
    #[must_use]
    pub fn attribute(&self, trait_type: &str) -> Option<&Value> {
        self.0
            .get("attributes")?
            .as_array()?
            .iter()
            .find(|attr| attr.get("trait_type").and_then(Value::as_str) == Some(trait_type))
            .and_then(|attr| attr.get("value"))
    }

    /// Raw field access.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

// =============================================================================
// CLUSTER D: DEPLOYMENT
// =============================================================================

/// Location of the deployed ledger contract.
///
/// Written once by the deploy step; read by every later run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Contract address.
    pub address: Address,
    /// Network label the contract was deployed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Deployment time.
    pub timestamp: DateTime<Utc>,
}
