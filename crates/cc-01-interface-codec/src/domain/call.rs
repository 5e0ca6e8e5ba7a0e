//! # Call Requests
//!
//! A call request is built per invocation and consumed immediately by the
//! codec; nothing retains it.

use super::abi::{FunctionSignature, AUTHORIZE_ENTITY, ISSUE_RECORD, READ_COUNT, READ_RECORD};
use super::token::Token;
use crate::codec::encode_call;
use crate::errors::CodecError;
use shared_types::{Address, Hash, U256};

/// Target contract, function and ordered argument values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Contract address.
    pub target: Address,
    /// Function from the signature table.
    pub function: &'static FunctionSignature,
    /// Argument values in declaration order.
    pub args: Vec<Token>,
}

impl CallRequest {
    pub fn new(target: Address, function: &'static FunctionSignature, args: Vec<Token>) -> Self {
        Self {
            target,
            function,
            args,
        }
    }

    /// `authorize-entity(entity)`.
    #[must_use]
    pub fn authorize_entity(target: Address, entity: Address) -> Self {
        Self::new(target, &AUTHORIZE_ENTITY, vec![Token::Address(entity)])
    }

    /// `issue-record(subject, contentHash, category)`.
    #[must_use]
    pub fn issue_record(target: Address, subject: Address, content_hash: Hash, category: u8) -> Self {
        Self::new(
            target,
            &ISSUE_RECORD,
            vec![
                Token::Address(subject),
                Token::FixedBytes(content_hash),
                Token::uint(u64::from(category)),
            ],
        )
    }

    /// `read-record(id)`.
    #[must_use]
    pub fn read_record(target: Address, id: u64) -> Self {
        Self::new(target, &READ_RECORD, vec![Token::Uint(U256::from(id))])
    }

    /// `read-count()`.
    #[must_use]
    pub fn read_count(target: Address) -> Self {
        Self::new(target, &READ_COUNT, Vec::new())
    }

    /// Function name, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.function.name
    }

    /// Encodes this request into call-data.
    ///
    /// # Errors
    ///
    /// Fails when the arguments do not match the signature.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        encode_call(self.function, &self.args)
    }
}
