//! Pipeline configuration with validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Contract address override; wins over the deployment record.
    pub contract_address: Option<String>,
    /// Deployment record written by `deploy` and read by later runs.
    pub deploy_record_path: PathBuf,
    /// Metadata index file.
    pub metadata_index_path: PathBuf,
    /// Network label stored in deployment records.
    pub network: String,
    /// Issuance defaults
    pub defaults: IssueDefaults,
    /// Content publisher
    pub publisher: PublisherConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            contract_address: None,
            deploy_record_path: PathBuf::from("backend/last_deploy.json"),
            metadata_index_path: PathBuf::from("backend/metadata.json"),
            network: "localhost".to_string(),
            defaults: IssueDefaults::default(),
            publisher: PublisherConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.trim().is_empty() {
            return Err(ConfigError::Invalid("network label cannot be empty".into()));
        }
        if self.defaults.name.trim().is_empty() {
            return Err(ConfigError::Invalid("default certificate name cannot be empty".into()));
        }
        self.publisher.validate()
    }
}

/// Values applied when a flat issuance request leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueDefaults {
    /// Record name.
    pub name: String,
    /// Record description.
    pub description: String,
    /// Category code anchored on-chain.
    pub category_code: u8,
}

impl Default for IssueDefaults {
    fn default() -> Self {
        Self {
            name: "Blockchain Workshop Certificate".to_string(),
            description: "Official academic certificate".to_string(),
            category_code: 1,
        }
    }
}

/// Content-distribution service (Pinata) configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// JSON pinning endpoint.
    pub endpoint: String,
    /// `pinata_api_key` header value.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// `pinata_secret_api_key` header value.
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.pinata.cloud/pinning/pinJSONToIPFS".to_string(),
            api_key: None,
            secret: None,
            timeout_secs: 60,
        }
    }
}

impl PublisherConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.endpoint.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("publisher timeout cannot be 0".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Endpoint is not an HTTP(S) URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
