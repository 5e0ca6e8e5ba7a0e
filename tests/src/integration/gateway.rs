//! # Gateway Flows
//!
//! Requests through the cc-05 router into a live cc-04 pipeline, checked
//! against what the ledger and the metadata index actually hold.

#[cfg(test)]
mod tests {
    use super::super::fixtures::deployed_ledger;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use cc_04_certificate_pipeline::testing::TestHarness;
    use cc_05_api_gateway::{ApiGatewayService, GatewayConfig};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use shared_types::{hash_key, keccak256};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn post(router: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::post("/issue")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn flat_body(fullname: &str) -> Value {
        json!({
            "fullname": fullname,
            "institution": "B",
            "program": "C",
            "activity": "D",
            "category": "E",
            "issuedAt": "2026-01-01"
        })
    }

    #[tokio::test]
    async fn test_issued_certificate_verifies_through_pipeline() {
        let harness = TestHarness::new(deployed_ledger());
        let ledger = harness.ledger.clone();
        let pipeline = Arc::new(harness.pipeline);
        let gateway = ApiGatewayService::new(GatewayConfig::default(), pipeline.clone()).unwrap();

        let (status, body) = post(gateway.router(), flat_body("A")).await;

        assert_eq!(status, StatusCode::OK);
        let locator = body["contentLocator"].as_str().unwrap();
        let content_hash = keccak256(locator.as_bytes());
        assert_eq!(body["contentHash"], json!(hash_key(&content_hash)));
        assert_eq!(ledger.certificates()[0].content_hash, content_hash);

        let cert_id = body["certId"].as_u64().unwrap();
        let verification = pipeline.verify(Some(cert_id)).await.unwrap();
        assert_eq!(
            serde_json::to_value(verification.resolved.metadata().unwrap()).unwrap(),
            body["metadata"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests_all_land() {
        let harness = TestHarness::new(deployed_ledger());
        let ledger = harness.ledger.clone();
        let store = harness.store.clone();
        let gateway =
            ApiGatewayService::new(GatewayConfig::default(), Arc::new(harness.pipeline)).unwrap();
        let router = gateway.router();

        let requests = (0..4).map(|n| post(router.clone(), flat_body(&format!("Graduate {n}"))));
        let responses = spawn_all(requests).await;

        for (status, body) in &responses {
            assert_eq!(*status, StatusCode::OK);
            // Ids are advisory under concurrency, but always within range
            assert!(body["certId"].as_u64().unwrap() < 4);
        }
        assert_eq!(ledger.certificates().len(), 4);
        assert_eq!(store.len(), 4);
    }

    /// Spawns every future and collects the outputs in order.
    async fn spawn_all<F>(futures: impl Iterator<Item = F>) -> Vec<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handles: Vec<_> = futures.map(tokio::spawn).collect();
        let mut outputs = Vec::with_capacity(handles.len());
        for handle in handles {
            outputs.push(handle.await.unwrap());
        }
        outputs
    }

    #[tokio::test]
    async fn test_failed_request_leaves_ledger_untouched() {
        let harness = TestHarness::new(deployed_ledger());
        let ledger = harness.ledger.clone();
        let gateway =
            ApiGatewayService::new(GatewayConfig::default(), Arc::new(harness.pipeline)).unwrap();

        let (status, body) = post(gateway.router(), json!({ "fullname": "A" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("institution"));
        assert_eq!(ledger.transactions_sent(), 0);
    }
}
