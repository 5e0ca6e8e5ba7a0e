//! # Ledger Primitives
//!
//! Fixed-size ledger values and the content-hash function.

use sha3::{Digest, Keccak256};

// Re-export primitive types for use across all subsystems
pub use ethereum_types::U64;
pub use primitive_types::{H160 as Address, H256 as Hash, U256};

/// Computes the Keccak-256 digest of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    Hash::from_slice(&Keccak256::digest(data))
}

/// Canonical index key for a content hash: lowercase, `0x`-prefixed hex.
#[must_use]
pub fn hash_key(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

/// Lowercase, `0x`-prefixed hex form of an address.
#[must_use]
pub fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

/// Encodes arbitrary bytes as `0x`-prefixed hex.
#[must_use]
pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes `0x`-prefixed (or bare) hex into bytes.
///
/// # Errors
///
/// Returns the underlying hex error for odd-length or non-hex input.
pub fn from_hex_data(data: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = data.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(stripped)
}

/// Parses a 20-byte address from hex text.
#[must_use]
pub fn parse_address(text: &str) -> Option<Address> {
    let bytes = from_hex_data(text).ok()?;
    (bytes.len() == 20).then(|| Address::from_slice(&bytes))
}
