//! # Error Types
//!
//! The pipeline's error taxonomy. Store failures are absent on purpose: they
//! are logged and downgraded, never surfaced.

use cc_01_interface_codec::CodecError;
use cc_02_transaction_submission::LedgerError;
use thiserror::Error;

/// Errors surfaced by pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required input field is missing.
    #[error("{field} is required")]
    Validation { field: String },

    /// An optional input field is present but unusable.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// The node manages no signing accounts.
    #[error("no accounts available on the connected node")]
    NoAccountsAvailable,

    /// Ledger return data does not match the contract surface.
    #[error("malformed ledger result: {0}")]
    MalformedResult(CodecError),

    /// The content-distribution service rejected the upload.
    #[error("upload failed: {0}")]
    UploadFailure(#[from] UploadError),

    /// Both submission paths failed.
    #[error("{0}")]
    SubmissionFailure(LedgerError),

    /// Neither an override nor a deployment record names the contract.
    #[error("contract address not configured and no deployment record found at {path}")]
    ContractAddressUnresolved { path: String },

    /// The contract holds no records yet.
    #[error("no certificates have been issued")]
    NoRecords,

    /// Deployment bytecode could not be loaded.
    #[error("invalid contract artifact: {0}")]
    Artifact(String),

    /// Any other ledger failure.
    #[error(transparent)]
    Ledger(LedgerError),
}

impl PipelineError {
    /// True for errors the caller can fix by changing its input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidField { .. })
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<LedgerError> for PipelineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NoAccountsAvailable => Self::NoAccountsAvailable,
            LedgerError::SubmissionFailure { .. } => Self::SubmissionFailure(err),
            LedgerError::Codec(codec @ CodecError::MalformedResult { .. }) => {
                Self::MalformedResult(codec)
            }
            other => Self::Ledger(other),
        }
    }
}

impl From<CodecError> for PipelineError {
    fn from(err: CodecError) -> Self {
        Self::from(LedgerError::Codec(err))
    }
}

/// Errors from the content-distribution service.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Credentials are not configured.
    #[error("content publisher credentials are not configured")]
    MissingCredentials,

    /// The service could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The service answered without a usable locator.
    #[error("invalid service response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_classification() {
        assert!(matches!(
            PipelineError::from(LedgerError::NoAccountsAvailable),
            PipelineError::NoAccountsAvailable
        ));
        let malformed = CodecError::MalformedResult {
            function: "totalCertificates".into(),
            reason: "expected 32 bytes, got 0".into(),
        };
        assert!(matches!(
            PipelineError::from(malformed),
            PipelineError::MalformedResult(_)
        ));
        let failure = LedgerError::SubmissionFailure {
            preferred: "unsupported".into(),
            broadcast: None,
            fallback: Box::new(LedgerError::Transport("down".into())),
        };
        assert!(matches!(
            PipelineError::from(failure),
            PipelineError::SubmissionFailure(_)
        ));
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = PipelineError::Validation {
            field: "fullname".into(),
        };
        assert_eq!(err.to_string(), "fullname is required");
        assert!(err.is_client_error());
    }
}
