//! # Issuance Flows
//!
//! Publish → index → anchor across cc-02, cc-03 and cc-04:
//!
//! 1. The anchored hash is keccak-256 of the locator string
//! 2. Record ids follow the contract count while issuance is serialized
//! 3. Validation failures never reach the publisher or the ledger
//! 4. A foreign issuance between submit and count read skews the reported id

#[cfg(test)]
mod tests {
    use super::super::fixtures::{deployed_ledger, flat_request};
    use cc_02_transaction_submission::testing::InMemoryLedger;
    use cc_03_metadata_store::MetadataStore;
    use cc_04_certificate_pipeline::config::IssueDefaults;
    use cc_04_certificate_pipeline::domain::request::IssueRequest;
    use cc_04_certificate_pipeline::testing::TestHarness;
    use cc_04_certificate_pipeline::PipelineError;
    use serde_json::json;
    use shared_types::{keccak256, Address, CertificateTuple, Hash};

    // =========================================================================
    // ANCHORING
    // =========================================================================

    #[tokio::test]
    async fn test_flat_request_end_to_end() {
        let harness = TestHarness::new(deployed_ledger());
        harness.ledger.inject_certificate(CertificateTuple {
            issuer: Address::repeat_byte(0x01),
            subject: Address::repeat_byte(0x02),
            category: 3,
            content_hash: Hash::repeat_byte(0x04),
        });
        let prior = harness.ledger.certificates().len() as u64;

        let receipt = harness.pipeline.issue(&flat_request("A")).await.unwrap();

        assert_eq!(receipt.record_id, Some(prior));
        assert_eq!(receipt.content_hash.as_bytes().len(), 32);
        assert_eq!(
            receipt.metadata.name(),
            Some(IssueDefaults::default().name.as_str())
        );
        assert_eq!(receipt.metadata.attribute("Full Name"), Some(&json!("A")));
        assert_eq!(receipt.metadata.attribute("Category"), Some(&json!("E")));
        assert_eq!(receipt.contract, InMemoryLedger::CONTRACT);
        assert!(receipt.outcome.is_confirmed());
    }

    #[tokio::test]
    async fn test_on_chain_hash_is_hash_of_locator() {
        let harness = TestHarness::new(deployed_ledger());

        let receipt = harness.pipeline.issue(&flat_request("A")).await.unwrap();

        let (locator, uploaded) = harness.publisher.uploads().remove(0);
        assert_eq!(locator, receipt.content_locator);
        assert_eq!(uploaded, receipt.metadata);

        let stored = harness.ledger.certificates()[0];
        assert_eq!(stored.content_hash, keccak256(locator.as_bytes()));

        let indexed = harness.store.get(&stored.content_hash).await.unwrap();
        assert_eq!(indexed, Some(receipt.metadata));
    }

    #[tokio::test]
    async fn test_structured_metadata_is_published_verbatim() {
        let harness = TestHarness::new(deployed_ledger());
        let metadata = json!({
            "name": "Transcript",
            "description": "Issued by the registrar",
            "attributes": [{ "trait_type": "Level", "value": "Graduate" }],
            "image": "ipfs://cover"
        });
        let request: IssueRequest =
            serde_json::from_value(json!({ "metadata": metadata.clone() })).unwrap();

        let receipt = harness.pipeline.issue(&request).await.unwrap();

        assert_eq!(
            serde_json::to_value(&receipt.metadata).unwrap(),
            metadata
        );
        assert_eq!(harness.ledger.certificates().len(), 1);
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    #[tokio::test]
    async fn test_empty_request_touches_nothing() {
        let harness = TestHarness::new(deployed_ledger());

        let err = harness
            .pipeline
            .issue(&IssueRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Validation { ref field } if field == "fullname"));
        assert!(harness.publisher.uploads().is_empty());
        assert!(harness.store.is_empty());
        assert_eq!(harness.ledger.call_count("eth_accounts"), 0);
        assert_eq!(harness.ledger.transactions_sent(), 0);
    }

    // =========================================================================
    // RECORD IDS
    // =========================================================================

    #[tokio::test]
    async fn test_serialized_issuance_yields_consecutive_ids() {
        let harness = TestHarness::new(deployed_ledger());

        let mut ids = Vec::new();
        for n in 0..5 {
            let receipt = harness
                .pipeline
                .issue(&flat_request(&format!("Graduate {n}")))
                .await
                .unwrap();
            ids.push(receipt.record_id.unwrap());
        }

        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(harness.ledger.certificates().len(), 5);
        assert_eq!(harness.store.len(), 5);
    }

    #[tokio::test]
    async fn test_foreign_issuance_skews_reported_id() {
        let harness = TestHarness::new(deployed_ledger());
        harness.ledger.interleave_foreign_issuances(1);

        let receipt = harness.pipeline.issue(&flat_request("A")).await.unwrap();

        // Own record landed at 0; the count read already includes the foreign one
        assert_eq!(receipt.record_id, Some(1));
        assert_eq!(
            harness.ledger.certificates()[0].content_hash,
            receipt.content_hash
        );

        let reported = harness.pipeline.verify(receipt.record_id).await.unwrap();
        assert_eq!(reported.certificate.issuer, InMemoryLedger::FOREIGN_ISSUER);
        assert!(reported.resolved.is_degraded());

        let own = harness.pipeline.verify(Some(0)).await.unwrap();
        assert_eq!(own.resolved.metadata(), Some(&receipt.metadata));
    }
}
