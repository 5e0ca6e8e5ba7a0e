//! API Gateway service - HTTP server around the certificate pipeline.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::handlers::{fallback, issue, AppState};
use crate::middleware::{create_cors_layer, preflight_no_content};
use axum::routing::post;
use axum::Router;
use cc_04_certificate_pipeline::CertificatePipeline;
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    pipeline: Arc<CertificatePipeline>,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(
        config: GatewayConfig,
        pipeline: Arc<CertificatePipeline>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;
        Ok(Self { config, pipeline })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            pipeline: Arc::clone(&self.pipeline),
            rpc_url: self.config.rpc_url.clone(),
            port: self.config.port,
        };

        // Outermost first: the 204 rewrite must wrap the CORS layer
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::from_fn(preflight_no_content))
            .layer(create_cors_layer(&self.config.cors));

        Router::new()
            .route("/issue", post(issue).fallback(fallback))
            .fallback(fallback)
            .layer(middleware)
            .with_state(state)
    }

    /// Serve until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %addr, rpc = %self.config.rpc_url, "[cc-05] Server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("[cc-05] Server stopped");
        Ok(())
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> Result<(), GatewayError> {
        self.serve_with_shutdown(async {
            // An error here means no signal handler; run until killed instead
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
