//! # CC-01 Interface Codec - Contract Call Encoding
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Translates between typed certificate-contract invocations and the raw
//! byte payloads the ledger accepts and returns. Pure and synchronous: no I/O,
//! no shared state.
//!
//! ## Contract Surface
//!
//! | Operation | Function | Inputs | Outputs |
//! |-----------|----------|--------|---------|
//! | authorize-entity | `verifyOrganization` | `address` | - |
//! | issue-record | `issueCertificate` | `address, bytes32, uint8` | - |
//! | read-record | `verifyCertificate` | `uint256` | `address, address, uint8, bytes32` |
//! | read-count | `totalCertificates` | - | `uint256` |
//!
//! ## Guarantees
//!
//! - Encoding is deterministic: identical requests yield identical bytes.
//! - Decoding never guesses: a length or type mismatch is `MalformedResult`.
//!
//! ## Usage Example
//!
//! ```ignore
//! use cc_01_interface_codec::prelude::*;
//!
//! let data = CallRequest::issue_record(contract, subject, hash, 1).encode()?;
//! let tokens = decode_result(&READ_RECORD, &returned)?;
//! let record = certificate_from_tokens(&tokens)?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod codec;
pub mod domain;
pub mod errors;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::codec::{
        certificate_from_tokens, certificate_to_tokens, count_from_tokens, decode_input,
        decode_result, encode_call, encode_values,
    };
    pub use crate::domain::abi::{
        lookup, lookup_selector, AbiType, FunctionSignature, AUTHORIZE_ENTITY, CERTIFICATE_ABI,
        ISSUE_RECORD, READ_COUNT, READ_RECORD,
    };
    pub use crate::domain::call::CallRequest;
    pub use crate::domain::token::Token;
    pub use crate::errors::CodecError;
}

pub use codec::{decode_input, decode_result, encode_call};
pub use domain::abi::{AbiType, FunctionSignature};
pub use domain::call::CallRequest;
pub use domain::token::Token;
pub use errors::CodecError;

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 1;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Interface Codec";
