//! # Typed Values
//!
//! Argument and result values exchanged with the codec.

use super::abi::AbiType;
use serde::Serialize;
use shared_types::{Address, Hash, U256};

/// A typed ABI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Token {
    /// Account address.
    Address(Address),
    /// 32-byte fixed byte string.
    FixedBytes(Hash),
    /// Unsigned integer of any supported width.
    Uint(U256),
}

impl Token {
    /// Unsigned integer token.
    pub fn uint(value: impl Into<U256>) -> Self {
        Self::Uint(value.into())
    }

    /// True when the token's kind matches `ty`. Width is checked separately.
    #[must_use]
    pub fn kind_matches(&self, ty: AbiType) -> bool {
        matches!(
            (self, ty),
            (Self::Address(_), AbiType::Address)
                | (Self::FixedBytes(_), AbiType::Bytes32)
                | (Self::Uint(_), AbiType::Uint(_))
        )
    }

    #[must_use]
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(address) => Some(*address),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_hash(&self) -> Option<Hash> {
        match self {
            Self::FixedBytes(hash) => Some(*hash),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(value) => Some(*value),
            _ => None,
        }
    }
}
