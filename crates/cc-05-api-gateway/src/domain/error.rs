//! Gateway error types and their HTTP mapping.
//!
//! Every error leaves the gateway as `{"error": "<message>"}`. Input the
//! caller can fix is a 400; everything else is a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cc_04_certificate_pipeline::PipelineError;
use serde_json::json;
use thiserror::Error;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request body is not JSON or not an object of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Pipeline failure.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Configuration rejected at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Listener could not be bound or the server stopped.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Pipeline(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        crate::handlers::pretty_json(self.status_code(), &json!({ "error": self.to_string() }))
    }
}
