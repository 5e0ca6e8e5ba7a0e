//! Ledger connection configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Ledger node connection and submission settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitterConfig {
    /// JSON-RPC endpoint of the ledger node.
    pub rpc_url: String,
    /// Interval between receipt polls.
    pub poll_interval_ms: u64,
    /// Per-request timeout enforced by the HTTP client.
    pub request_timeout_secs: u64,
    /// Hex secret key enabling the local-wallet typed-call path.
    #[serde(skip_serializing)]
    pub signer_key: Option<String>,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            poll_interval_ms: 500,
            request_timeout_secs: 30,
            signer_key: None,
        }
    }
}

impl SubmitterConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.rpc_url.clone()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms cannot be 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs cannot be 0".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Node endpoint is not an HTTP(S) URL
    #[error("invalid RPC URL: {0}")]
    InvalidUrl(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
