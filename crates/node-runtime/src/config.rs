//! # Node Configuration
//!
//! Unified configuration for every subsystem, read from the environment.
//!
//! | Variable | Target | Default |
//! |----------|--------|---------|
//! | `RPC_URL` | ledger node endpoint | `http://127.0.0.1:8545` |
//! | `PORT` | HTTP port | `3000` |
//! | `CONTRACT_ADDRESS` | contract override | deployment record |
//! | `PINATA_API_KEY` / `PINATA_SECRET` | publisher credentials | none |
//! | `PINATA_ENDPOINT` | publisher endpoint | Pinata `pinJSONToIPFS` |
//! | `CC_DEPLOY_RECORD` | deployment record path | `backend/last_deploy.json` |
//! | `CC_METADATA_INDEX` | metadata index path | `backend/metadata.json` |
//! | `CC_SIGNER_KEY` | local wallet key | none (raw path only) |
//! | `CC_POLL_INTERVAL_MS` | receipt poll interval | `500` |
//! | `CC_NETWORK` | deployment network label | `localhost` |
//! | `CC_LOG_JSON` | JSON log output | off |

use cc_02_transaction_submission::config::SubmitterConfig;
use cc_04_certificate_pipeline::config::PipelineConfig;
use cc_05_api_gateway::GatewayConfig;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Ledger connection.
    pub submitter: SubmitterConfig,
    /// Pipeline paths, defaults and publisher.
    pub pipeline: PipelineConfig,
    /// HTTP facade.
    pub gateway: GatewayConfig,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl NodeConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, starting from defaults.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("RPC_URL") {
            config.gateway.rpc_url.clone_from(&url);
            config.submitter.rpc_url = url;
        }
        if let Some(port) = get("PORT") {
            config.gateway.port = parse("PORT", &port)?;
        }
        if let Some(interval) = get("CC_POLL_INTERVAL_MS") {
            config.submitter.poll_interval_ms = parse("CC_POLL_INTERVAL_MS", &interval)?;
        }
        config.submitter.signer_key = get("CC_SIGNER_KEY");

        config.pipeline.contract_address = get("CONTRACT_ADDRESS");
        if let Some(path) = get("CC_DEPLOY_RECORD") {
            config.pipeline.deploy_record_path = PathBuf::from(path);
        }
        if let Some(path) = get("CC_METADATA_INDEX") {
            config.pipeline.metadata_index_path = PathBuf::from(path);
        }
        if let Some(network) = get("CC_NETWORK") {
            config.pipeline.network = network;
        }

        config.pipeline.publisher.api_key = get("PINATA_API_KEY");
        config.pipeline.publisher.secret = get("PINATA_SECRET");
        if let Some(endpoint) = get("PINATA_ENDPOINT") {
            config.pipeline.publisher.endpoint = endpoint;
        }

        config.log_json = get("CC_LOG_JSON").is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        config.validate()?;
        Ok(config)
    }

    /// Validates every subsystem section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.submitter
            .validate()
            .map_err(|e| ConfigError::Section("ledger", e.to_string()))?;
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Section("pipeline", e.to_string()))?;
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Section("gateway", e.to_string()))?;
        Ok(())
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("{key}={value:?} is invalid: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    /// A subsystem rejected its section.
    #[error("{0} configuration: {1}")]
    Section(&'static str, String),
}
