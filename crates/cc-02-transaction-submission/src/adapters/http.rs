//! # HTTP JSON-RPC Transport
//!
//! Speaks JSON-RPC 2.0 over HTTP POST to the ledger node.

use crate::errors::LedgerError;
use crate::ports::JsonRpcTransport;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// JSON-RPC client for a ledger node's HTTP endpoint.
pub struct HttpTransport {
    http_client: reqwest::Client,
    rpc_url: String,
    request_id: AtomicU64,
}

impl HttpTransport {
    /// Default per-request timeout enforced by the HTTP client.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::with_timeout(rpc_url, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(rpc_url: impl Into<String>, timeout: Duration) -> Self {
        // reqwest::Client::new() is infallible; fall back to it if the builder fails
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client,
            rpc_url: rpc_url.into(),
            request_id: AtomicU64::new(1),
        }
    }

    /// Node endpoint this transport posts to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl JsonRpcTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        debug!(method, id, "[cc-02] JSON-RPC request");

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(format!("failed to send {method}: {e}")))?;

        let status = response.status();
        let rpc_response: JsonRpcResponse = response.json().await.map_err(|e| {
            LedgerError::Transport(format!("failed to parse {method} response (HTTP {status}): {e}"))
        })?;

        if let Some(error) = rpc_response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(rpc_response.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NodeClient;
    use serde_json::json;
    use shared_types::Address;
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, rpc_method: &str, body: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "jsonrpc": "2.0", "method": rpc_method })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_accounts_roundtrip() {
        let server = MockServer::start().await;
        let first = format!("0x{}", "11".repeat(20));
        mount(
            &server,
            "eth_accounts",
            json!({ "jsonrpc": "2.0", "id": 1, "result": [first] }),
        )
        .await;

        let client = NodeClient::new(Arc::new(HttpTransport::new(server.uri())));
        let accounts = client.accounts().await.unwrap();
        assert_eq!(accounts, vec![Address::repeat_byte(0x11)]);
    }

    #[tokio::test]
    async fn test_null_result_is_pending_receipt() {
        let server = MockServer::start().await;
        mount(
            &server,
            "eth_getTransactionReceipt",
            json!({ "jsonrpc": "2.0", "id": 1, "result": null }),
        )
        .await;

        let client = NodeClient::new(Arc::new(HttpTransport::new(server.uri())));
        let receipt = client
            .transaction_receipt(shared_types::Hash::zero())
            .await
            .unwrap();
        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn test_rpc_error_object() {
        let server = MockServer::start().await;
        mount(
            &server,
            "eth_sendTransaction",
            json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32000, "message": "unknown account" } }),
        )
        .await;

        let transport = HttpTransport::new(server.uri());
        let err = transport
            .request("eth_sendTransaction", json!([{}]))
            .await
            .unwrap_err();
        match err {
            LedgerError::Rpc { code, message } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "unknown account");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let transport = HttpTransport::with_timeout("http://127.0.0.1:1", Duration::from_secs(2));
        let err = transport.request("eth_accounts", json!([])).await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri());
        let err = transport.request("eth_chainId", json!([])).await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }
}
