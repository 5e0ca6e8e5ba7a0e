// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! CC-05 API Gateway - HTTP facade over the certificate pipeline.
//!
//! **Subsystem ID:** 5
//!
//! # Architecture
//!
//! ```text
//!   client ── POST /issue ──┐
//!                           ▼
//!          ┌──────────────────────────────┐
//!          │  TraceLayer → 204 → CORS (*) │
//!          ├──────────────────────────────┤
//!          │  issue │ status              │
//!          └────┬─────────────────────────┘
//!               ▼
//!      CertificatePipeline::issue (cc-04)
//! ```
//!
//! Each request runs its own pipeline invocation. Nothing serializes
//! concurrent requests, so the metadata index race and the advisory record
//! id described in cc-03 and cc-04 apply here unchanged.
//!
//! # Usage
//!
//! ```ignore
//! use cc_05_api_gateway::{ApiGatewayService, GatewayConfig};
//!
//! let service = ApiGatewayService::new(GatewayConfig::default(), pipeline)?;
//! service.serve().await?;
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use domain::config::{ConfigError, CorsConfig, GatewayConfig};
pub use domain::error::GatewayError;
pub use handlers::IssueResponse;
pub use service::ApiGatewayService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 5;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "API Gateway";
