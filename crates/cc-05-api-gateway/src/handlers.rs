//! Route handlers.
//!
//! | Route | Response |
//! |-------|----------|
//! | `POST /issue` | issuance envelope, or `{error}` with 400/500 |
//! | `OPTIONS *` | 204, from the CORS middleware |
//! | anything else | `{status: "ok", rpc, port}` |
//!
//! All JSON bodies are pretty-printed.

use crate::domain::error::GatewayError;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use cc_04_certificate_pipeline::domain::outcome::IssuanceReceipt;
use cc_04_certificate_pipeline::domain::request::IssueRequest;
use cc_04_certificate_pipeline::CertificatePipeline;
use serde::Serialize;
use serde_json::{json, Value};
use shared_types::{address_hex, hash_key};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CertificatePipeline>,
    /// Node endpoint reported by the status route.
    pub rpc_url: String,
    pub port: u16,
}

/// Successful issuance envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub success: bool,
    pub contract_address: String,
    pub tx_hash: String,
    /// `null` when the record count could not be read after confirmation.
    pub cert_id: Option<u64>,
    pub content_locator: String,
    pub content_hash: String,
    pub metadata: Value,
}

impl From<IssuanceReceipt> for IssueResponse {
    fn from(receipt: IssuanceReceipt) -> Self {
        Self {
            success: true,
            contract_address: address_hex(&receipt.contract),
            tx_hash: hash_key(&receipt.tx_hash),
            cert_id: receipt.record_id,
            content_locator: receipt.content_locator,
            content_hash: hash_key(&receipt.content_hash),
            metadata: Value::Object(receipt.metadata.as_map().clone()),
        }
    }
}

/// Serializes `value` as pretty JSON with the given status.
pub fn pretty_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec_pretty(value) {
        Ok(bytes) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(bytes),
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Parses an issuance body. An empty body is an empty request.
fn parse_request(body: &[u8]) -> Result<IssueRequest, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(IssueRequest::default());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| GatewayError::InvalidBody(e.to_string()))?;
    if !value.is_object() {
        return Err(GatewayError::InvalidBody("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| GatewayError::InvalidBody(e.to_string()))
}

/// `POST /issue`
pub async fn issue(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let result = async {
        let request = parse_request(&body)?;
        let receipt = state.pipeline.issue(&request).await?;
        Ok::<_, GatewayError>(IssueResponse::from(receipt))
    }
    .await;

    match result {
        Ok(response) => {
            info!(
                request_id = %request_id,
                tx_hash = %response.tx_hash,
                cert_id = ?response.cert_id,
                "[cc-05] Issue request served"
            );
            pretty_json(StatusCode::OK, &response)
        }
        Err(err) => {
            warn!(
                request_id = %request_id,
                status = err.status_code().as_u16(),
                error = %err,
                "[cc-05] Issue request failed"
            );
            err.into_response()
        }
    }
}

/// Liveness for every other route.
pub async fn fallback(State(state): State<AppState>) -> Response {
    pretty_json(
        StatusCode::OK,
        &json!({ "status": "ok", "rpc": state.rpc_url, "port": state.port }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_request() {
        assert_eq!(parse_request(b"").unwrap(), IssueRequest::default());
        assert_eq!(parse_request(b"  \n").unwrap(), IssueRequest::default());
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_request(b"{ fullname"),
            Err(GatewayError::InvalidBody(_))
        ));
        assert!(matches!(
            parse_request(b"[1, 2]"),
            Err(GatewayError::InvalidBody(_))
        ));
        // Wrong field type
        assert!(matches!(
            parse_request(br#"{ "categoryCode": "seven" }"#),
            Err(GatewayError::InvalidBody(_))
        ));
    }
}
