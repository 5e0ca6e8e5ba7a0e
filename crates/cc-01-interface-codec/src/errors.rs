//! # Error Types
//!
//! Errors raised while encoding calls or decoding ledger return data.

use crate::domain::abi::AbiType;
use thiserror::Error;

/// Errors from the interface codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Function name is not part of the contract surface.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments for the signature.
    #[error("{function}: expected {expected} arguments, got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Argument value does not have the declared type.
    #[error("{function}: argument {index} must be {expected}")]
    ArgumentType {
        function: &'static str,
        index: usize,
        expected: AbiType,
    },

    /// Integer argument does not fit the declared width.
    #[error("{function}: argument {index} does not fit in {expected}")]
    ValueOutOfRange {
        function: &'static str,
        index: usize,
        expected: AbiType,
    },

    /// Return or input bytes do not match the signature.
    #[error("malformed result for {function}: {reason}")]
    MalformedResult { function: String, reason: String },

    /// Call-data starts with a different function selector.
    #[error("selector mismatch for {function}: found 0x{found}")]
    SelectorMismatch { function: &'static str, found: String },
}

impl CodecError {
    pub(crate) fn malformed(function: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResult {
            function: function.to_string(),
            reason: reason.into(),
        }
    }
}
