//! # Pinata Publisher
//!
//! Pins metadata JSON to IPFS through Pinata's `pinJSONToIPFS` endpoint and
//! returns `ipfs://<IpfsHash>`.

use crate::config::PublisherConfig;
use crate::errors::UploadError;
use crate::ports::ContentPublisher;
use async_trait::async_trait;
use serde::Deserialize;
use shared_types::MetadataRecord;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinResponse {
    ipfs_hash: String,
}

/// Pinata JSON pinning client.
///
/// Credentials are checked per upload, so a process without them can still
/// verify, deploy and authorize.
pub struct PinataPublisher {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: Option<(String, String)>,
}

impl PinataPublisher {
    pub fn from_config(config: &PublisherConfig) -> Self {
        let credentials = match (&config.api_key, &config.secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key.clone(), secret.clone()))
            }
            _ => None,
        };

        // reqwest::Client::new() is infallible; fall back to it if the builder fails
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            endpoint: config.endpoint.clone(),
            credentials,
        }
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}

impl std::fmt::Debug for PinataPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataPublisher")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContentPublisher for PinataPublisher {
    async fn publish(&self, record: &MetadataRecord) -> Result<String, UploadError> {
        let (api_key, secret) = self
            .credentials
            .as_ref()
            .ok_or(UploadError::MissingCredentials)?;
        debug!(endpoint = %self.endpoint, "[cc-04] Uploading metadata");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("pinata_api_key", api_key)
            .header("pinata_secret_api_key", secret)
            .json(record)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;
        if pinned.ipfs_hash.is_empty() {
            return Err(UploadError::InvalidResponse("empty IpfsHash".into()));
        }

        let locator = format!("ipfs://{}", pinned.ipfs_hash);
        info!(locator = %locator, "[cc-04] Metadata pinned");
        Ok(locator)
    }
}
