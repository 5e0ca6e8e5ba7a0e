//! # Function Signature Table
//!
//! The fixed contract surface of the certificate ledger. Defined once,
//! shared read-only by the submitter and the pipeline, never mutated.

use shared_types::keccak256;
use std::fmt;

/// Static ABI parameter types used by the certificate contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// 20-byte account address, left-padded to a word.
    Address,
    /// 32-byte fixed byte string.
    Bytes32,
    /// Unsigned integer of the given bit width (8..=256).
    Uint(u16),
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Bytes32 => f.write_str("bytes32"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
        }
    }
}

/// A contract function: name, ordered parameter types, return types.
#[derive(Debug, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Function name as declared by the contract.
    pub name: &'static str,
    /// Parameter types, in order.
    pub inputs: &'static [AbiType],
    /// Return types, in order.
    pub outputs: &'static [AbiType],
}

impl FunctionSignature {
    /// Canonical form hashed into the selector, e.g. `f(address,uint8)`.
    #[must_use]
    pub fn canonical(&self) -> String {
        let params: Vec<String> = self.inputs.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, params.join(","))
    }

    /// First four bytes of the Keccak-256 hash of the canonical form.
    #[must_use]
    pub fn selector(&self) -> [u8; 4] {
        let digest = keccak256(self.canonical().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&digest.as_bytes()[..4]);
        selector
    }
}

// =============================================================================
// CERTIFICATE CONTRACT SURFACE
// =============================================================================

/// `authorize-entity(address)`: admin approves an issuing authority.
pub static AUTHORIZE_ENTITY: FunctionSignature = FunctionSignature {
    name: "verifyOrganization",
    inputs: &[AbiType::Address],
    outputs: &[],
};

/// `issue-record(address subject, bytes32 contentHash, uint8 category)`.
pub static ISSUE_RECORD: FunctionSignature = FunctionSignature {
    name: "issueCertificate",
    inputs: &[AbiType::Address, AbiType::Bytes32, AbiType::Uint(8)],
    outputs: &[],
};

/// `read-record(uint256 id) -> (address issuer, address subject, uint8 category, bytes32 contentHash)`.
pub static READ_RECORD: FunctionSignature = FunctionSignature {
    name: "verifyCertificate",
    inputs: &[AbiType::Uint(256)],
    outputs: &[
        AbiType::Address,
        AbiType::Address,
        AbiType::Uint(8),
        AbiType::Bytes32,
    ],
};

/// `read-count() -> uint256`: total records issued.
pub static READ_COUNT: FunctionSignature = FunctionSignature {
    name: "totalCertificates",
    inputs: &[],
    outputs: &[AbiType::Uint(256)],
};

/// The complete contract surface.
pub static CERTIFICATE_ABI: [&FunctionSignature; 4] =
    [&AUTHORIZE_ENTITY, &ISSUE_RECORD, &READ_RECORD, &READ_COUNT];

/// Finds a signature by function name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static FunctionSignature> {
    CERTIFICATE_ABI.iter().copied().find(|sig| sig.name == name)
}

/// Finds a signature by its 4-byte selector.
#[must_use]
pub fn lookup_selector(selector: [u8; 4]) -> Option<&'static FunctionSignature> {
    CERTIFICATE_ABI
        .iter()
        .copied()
        .find(|sig| sig.selector() == selector)
}
