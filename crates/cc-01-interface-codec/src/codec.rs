//! # Call-Data Codec
//!
//! Canonical encoding for the static types used by the certificate contract.
//! Every value occupies one 32-byte big-endian word:
//!
//! | Type | Word layout |
//! |------|-------------|
//! | `address` | 12 zero bytes, then the 20 address bytes |
//! | `bytes32` | the 32 bytes as-is |
//! | `uintN` | big-endian integer, must fit in N bits |
//!
//! Call-data is the 4-byte selector followed by the argument words. Encoding
//! is pure and deterministic; decoding rejects any length or type mismatch.

use crate::domain::abi::{AbiType, FunctionSignature};
use crate::domain::token::Token;
use crate::errors::CodecError;
use shared_types::{Address, CertificateTuple, Hash, U256};

/// Size of one ABI word.
pub const WORD_SIZE: usize = 32;

/// Size of a function selector.
pub const SELECTOR_SIZE: usize = 4;

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a call: selector followed by the argument words.
///
/// # Errors
///
/// Returns an error when the argument count, kinds or widths do not match.
pub fn encode_call(function: &FunctionSignature, args: &[Token]) -> Result<Vec<u8>, CodecError> {
    let words = encode_values(function, function.inputs, args)?;
    let mut data = Vec::with_capacity(SELECTOR_SIZE + words.len());
    data.extend_from_slice(&function.selector());
    data.extend_from_slice(&words);
    Ok(data)
}

/// Encodes values against an explicit type list (inputs or outputs).
///
/// # Errors
///
/// Returns an error when the value count, kinds or widths do not match.
pub fn encode_values(
    function: &FunctionSignature,
    types: &[AbiType],
    values: &[Token],
) -> Result<Vec<u8>, CodecError> {
    if types.len() != values.len() {
        return Err(CodecError::ArgumentCount {
            function: function.name,
            expected: types.len(),
            actual: values.len(),
        });
    }

    let mut out = Vec::with_capacity(types.len() * WORD_SIZE);
    for (index, (ty, value)) in types.iter().zip(values).enumerate() {
        out.extend_from_slice(&encode_word(function, index, *ty, value)?);
    }
    Ok(out)
}

fn encode_word(
    function: &FunctionSignature,
    index: usize,
    ty: AbiType,
    value: &Token,
) -> Result<[u8; WORD_SIZE], CodecError> {
    let mut word = [0u8; WORD_SIZE];
    match (ty, value) {
        (AbiType::Address, Token::Address(address)) => {
            word[12..].copy_from_slice(address.as_bytes());
        }
        (AbiType::Bytes32, Token::FixedBytes(hash)) => {
            word.copy_from_slice(hash.as_bytes());
        }
        (AbiType::Uint(bits), Token::Uint(number)) => {
            if number.bits() > usize::from(bits) {
                return Err(CodecError::ValueOutOfRange {
                    function: function.name,
                    index,
                    expected: ty,
                });
            }
            number.to_big_endian(&mut word);
        }
        _ => {
            return Err(CodecError::ArgumentType {
                function: function.name,
                index,
                expected: ty,
            })
        }
    }
    Ok(word)
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes raw return bytes into the signature's output values.
///
/// # Errors
///
/// `MalformedResult` when the byte length is not exactly one word per output
/// or a word does not hold a valid value of its declared type.
pub fn decode_result(function: &FunctionSignature, data: &[u8]) -> Result<Vec<Token>, CodecError> {
    decode_words(function, function.outputs, data)
}

/// Decodes call-data back into the signature's input values.
///
/// # Errors
///
/// `SelectorMismatch` when the selector belongs to another function,
/// `MalformedResult` when the argument words are malformed.
pub fn decode_input(function: &FunctionSignature, calldata: &[u8]) -> Result<Vec<Token>, CodecError> {
    if calldata.len() < SELECTOR_SIZE {
        return Err(CodecError::malformed(
            function.name,
            format!("call-data is {} bytes, shorter than a selector", calldata.len()),
        ));
    }
    let (selector, body) = calldata.split_at(SELECTOR_SIZE);
    if selector != function.selector() {
        return Err(CodecError::SelectorMismatch {
            function: function.name,
            found: selector.iter().map(|b| format!("{b:02x}")).collect(),
        });
    }
    decode_words(function, function.inputs, body)
}

fn decode_words(
    function: &FunctionSignature,
    types: &[AbiType],
    data: &[u8],
) -> Result<Vec<Token>, CodecError> {
    let expected = types.len() * WORD_SIZE;
    if data.len() != expected {
        return Err(CodecError::malformed(
            function.name,
            format!("expected {expected} bytes, got {}", data.len()),
        ));
    }

    types
        .iter()
        .zip(data.chunks_exact(WORD_SIZE))
        .enumerate()
        .map(|(index, (ty, word))| decode_word(function, index, *ty, word))
        .collect()
}

fn decode_word(
    function: &FunctionSignature,
    index: usize,
    ty: AbiType,
    word: &[u8],
) -> Result<Token, CodecError> {
    match ty {
        AbiType::Address => {
            if word[..12].iter().any(|b| *b != 0) {
                return Err(CodecError::malformed(
                    function.name,
                    format!("value {index} is not a left-padded address"),
                ));
            }
            Ok(Token::Address(Address::from_slice(&word[12..])))
        }
        AbiType::Bytes32 => Ok(Token::FixedBytes(Hash::from_slice(word))),
        AbiType::Uint(bits) => {
            let number = U256::from_big_endian(word);
            if number.bits() > usize::from(bits) {
                return Err(CodecError::malformed(
                    function.name,
                    format!("value {index} does not fit in {ty}"),
                ));
            }
            Ok(Token::Uint(number))
        }
    }
}

// =============================================================================
// TYPED PROJECTIONS
// =============================================================================

/// Interprets decoded `read-record` output as a certificate.
///
/// # Errors
///
/// `MalformedResult` when the values do not have the record's shape.
pub fn certificate_from_tokens(tokens: &[Token]) -> Result<CertificateTuple, CodecError> {
    let shape_error = || CodecError::malformed("verifyCertificate", "unexpected result shape");
    match tokens {
        [issuer, subject, category, content_hash] => {
            let category = category.as_uint().ok_or_else(shape_error)?;
            if category.bits() > 8 {
                return Err(shape_error());
            }
            Ok(CertificateTuple {
                issuer: issuer.as_address().ok_or_else(shape_error)?,
                subject: subject.as_address().ok_or_else(shape_error)?,
                category: category.low_u32() as u8,
                content_hash: content_hash.as_hash().ok_or_else(shape_error)?,
            })
        }
        _ => Err(shape_error()),
    }
}

/// Builds the `read-record` output values for a certificate.
#[must_use]
pub fn certificate_to_tokens(certificate: &CertificateTuple) -> Vec<Token> {
    vec![
        Token::Address(certificate.issuer),
        Token::Address(certificate.subject),
        Token::uint(u64::from(certificate.category)),
        Token::FixedBytes(certificate.content_hash),
    ]
}

/// Interprets decoded `read-count` output.
///
/// # Errors
///
/// `MalformedResult` when the output is not a single integer.
pub fn count_from_tokens(tokens: &[Token]) -> Result<U256, CodecError> {
    match tokens {
        [count] => count
            .as_uint()
            .ok_or_else(|| CodecError::malformed("totalCertificates", "count is not an integer")),
        _ => Err(CodecError::malformed(
            "totalCertificates",
            "unexpected result shape",
        )),
    }
}
