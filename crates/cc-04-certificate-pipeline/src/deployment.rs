//! # Deployment Records and Artifacts
//!
//! The deploy step writes `{address, network, timestamp}` as pretty JSON;
//! every later run reads `address` back unless an override is configured.

use crate::errors::PipelineError;
use serde_json::Value;
use shared_types::{from_hex_data, parse_address, Address, DeploymentRecord};
use std::path::Path;
use tracing::{debug, warn};

/// Reads the contract address from a deployment record.
///
/// Lenient: a missing, unreadable or address-less record yields `None`.
/// Only the `address` field is consulted.
pub async fn read_deployment_address(path: &Path) -> Option<Address> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "[cc-04] No deployment record");
            return None;
        }
    };
    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "[cc-04] Malformed deployment record");
            return None;
        }
    };
    value.get("address").and_then(Value::as_str).and_then(parse_address)
}

/// Resolves the ledger contract address.
///
/// The override wins, then the deployment record at `record_path`.
///
/// # Errors
///
/// [`PipelineError::InvalidField`] for an unparseable override,
/// [`PipelineError::ContractAddressUnresolved`] when nothing names a contract.
pub async fn resolve_contract_address(
    override_address: Option<&str>,
    record_path: &Path,
) -> Result<Address, PipelineError> {
    if let Some(text) = override_address.map(str::trim).filter(|s| !s.is_empty()) {
        return parse_address(text)
            .ok_or_else(|| PipelineError::invalid("contractAddress", "not a 20-byte hex address"));
    }
    read_deployment_address(record_path)
        .await
        .ok_or_else(|| PipelineError::ContractAddressUnresolved {
            path: record_path.display().to_string(),
        })
}

/// Writes a deployment record as pretty JSON, creating parent directories.
pub async fn save_deployment(path: &Path, record: &DeploymentRecord) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(record).map_err(std::io::Error::other)?;
    tokio::fs::write(path, bytes).await
}

/// Loads contract creation bytecode.
///
/// Accepts a compiled artifact whose `bytecode` is a hex string or an
/// object with an `object` field, or a file holding the hex alone.
///
/// # Errors
///
/// [`PipelineError::Artifact`] when the file is unreadable or holds no
/// usable bytecode.
pub async fn load_bytecode(path: &Path) -> Result<Vec<u8>, PipelineError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PipelineError::Artifact(format!("{}: {e}", path.display())))?;
    let text = text.trim();

    let hex_text = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(artifact)) => match artifact.get("bytecode") {
            Some(Value::String(code)) => code.clone(),
            Some(Value::Object(code)) => code
                .get("object")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| PipelineError::Artifact("bytecode.object missing".into()))?,
            _ => return Err(PipelineError::Artifact("artifact has no bytecode field".into())),
        },
        Ok(Value::String(code)) => code,
        _ => text.to_string(),
    };

    let bytecode = from_hex_data(hex_text.trim())
        .map_err(|e| PipelineError::Artifact(format!("bytecode is not hex: {e}")))?;
    if bytecode.is_empty() {
        return Err(PipelineError::Artifact("bytecode is empty".into()));
    }
    Ok(bytecode)
}
