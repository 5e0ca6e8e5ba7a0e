//! # Verification Flows
//!
//! Reading records back through cc-04: metadata resolution, the degraded
//! on-chain answer, and state that outlives a single pipeline instance
//! (deployment record and metadata index files).

#[cfg(test)]
mod tests {
    use super::super::fixtures::{deployed_ledger, flat_request};
    use cc_02_transaction_submission::testing::InMemoryLedger;
    use cc_02_transaction_submission::Submitter;
    use cc_03_metadata_store::JsonFileStore;
    use cc_04_certificate_pipeline::config::PipelineConfig;
    use cc_04_certificate_pipeline::domain::outcome::ResolvedRecord;
    use cc_04_certificate_pipeline::testing::{InMemoryPublisher, TestHarness};
    use cc_04_certificate_pipeline::{CertificatePipeline, PipelineError};
    use shared_types::{address_hex, Address, CertificateTuple, Hash};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    /// Pipeline over `ledger` backed by the index file at `index`.
    fn file_backed_pipeline(ledger: Arc<InMemoryLedger>, index: &Path) -> CertificatePipeline {
        let submitter = Submitter::new(ledger.clone(), Duration::from_millis(1));
        let signers = submitter.account_resolver();
        let config = PipelineConfig {
            contract_address: Some(address_hex(&InMemoryLedger::CONTRACT)),
            metadata_index_path: index.to_path_buf(),
            ..PipelineConfig::default()
        };
        CertificatePipeline::new(
            Arc::new(submitter),
            Arc::new(signers),
            Arc::new(JsonFileStore::new(index)),
            Arc::new(InMemoryPublisher::new()),
            config,
        )
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    #[tokio::test]
    async fn test_verify_resolves_indexed_metadata() {
        let harness = TestHarness::new(deployed_ledger());
        let receipt = harness.pipeline.issue(&flat_request("A")).await.unwrap();

        let verification = harness.pipeline.verify(receipt.record_id).await.unwrap();

        assert_eq!(verification.record_id, 0);
        assert_eq!(verification.certificate.content_hash, receipt.content_hash);
        assert_eq!(verification.certificate.issuer, receipt.issuer);
        assert_eq!(
            verification.resolved,
            ResolvedRecord::Metadata(receipt.metadata)
        );
    }

    #[tokio::test]
    async fn test_verify_is_repeatable() {
        let harness = TestHarness::new(deployed_ledger());
        harness.pipeline.issue(&flat_request("A")).await.unwrap();

        let first = harness.pipeline.verify(Some(0)).await.unwrap();
        let second = harness.pipeline.verify(Some(0)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(harness.ledger.transactions_sent(), 1);
    }

    #[tokio::test]
    async fn test_verify_without_id_reads_latest() {
        let harness = TestHarness::new(deployed_ledger());
        harness.pipeline.issue(&flat_request("A")).await.unwrap();
        let latest = harness.pipeline.issue(&flat_request("B")).await.unwrap();

        let verification = harness.pipeline.verify(None).await.unwrap();

        assert_eq!(verification.record_id, 1);
        assert_eq!(verification.resolved.metadata(), Some(&latest.metadata));
    }

    #[tokio::test]
    async fn test_unindexed_record_degrades_to_on_chain_tuple() {
        let harness = TestHarness::new(deployed_ledger());
        let injected = CertificateTuple {
            issuer: Address::repeat_byte(0x11),
            subject: Address::repeat_byte(0x22),
            category: 9,
            content_hash: Hash::repeat_byte(0x33),
        };
        let id = harness.ledger.inject_certificate(injected);

        let verification = harness.pipeline.verify(Some(id)).await.unwrap();

        assert_eq!(verification.certificate, injected);
        assert_eq!(verification.resolved, ResolvedRecord::OnChain(injected));
    }

    #[tokio::test]
    async fn test_missing_record_is_a_ledger_error() {
        let harness = TestHarness::new(deployed_ledger());

        assert!(matches!(
            harness.pipeline.verify(None).await,
            Err(PipelineError::NoRecords)
        ));
        assert!(matches!(
            harness.pipeline.verify(Some(7)).await,
            Err(PipelineError::Ledger(_))
        ));
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    #[tokio::test]
    async fn test_index_file_survives_pipeline_restart() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("backend").join("metadata.json");
        let ledger = Arc::new(deployed_ledger());

        let receipt = file_backed_pipeline(ledger.clone(), &index)
            .issue(&flat_request("A"))
            .await
            .unwrap();
        assert!(index.exists());

        let restarted = file_backed_pipeline(ledger, &index);
        let verification = restarted.verify(receipt.record_id).await.unwrap();

        assert_eq!(verification.resolved.metadata(), Some(&receipt.metadata));
    }

    #[tokio::test]
    async fn test_lost_index_file_degrades_verification() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("metadata.json");
        let ledger = Arc::new(deployed_ledger());

        let receipt = file_backed_pipeline(ledger.clone(), &index)
            .issue(&flat_request("A"))
            .await
            .unwrap();
        std::fs::remove_file(&index).unwrap();

        let verification = file_backed_pipeline(ledger, &index)
            .verify(receipt.record_id)
            .await
            .unwrap();

        assert!(verification.resolved.is_degraded());
        assert_eq!(verification.certificate.content_hash, receipt.content_hash);
    }

    #[tokio::test]
    async fn test_deploy_authorize_issue_verify_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(InMemoryLedger::new().with_authorization_required());
        let config = PipelineConfig {
            deploy_record_path: dir.path().join("last_deploy.json"),
            ..PipelineConfig::default()
        };
        let harness = TestHarness::with_config(ledger.clone(), config);

        let deployment = harness.pipeline.deploy(&[0x60, 0x80, 0x60, 0x40]).await.unwrap();
        assert_eq!(Some(deployment.address), ledger.contract());

        // The contract is now resolved from the record file alone
        let context = harness.pipeline.prepare().await.unwrap();
        assert_eq!(context.contract, deployment.address);

        let unauthorized = harness.pipeline.issue(&flat_request("A")).await;
        assert!(unauthorized.is_err());
        assert!(ledger.certificates().is_empty());

        harness.pipeline.authorize_issuer(&context).await.unwrap();
        assert!(ledger.is_authorized(context.roles.issuer));

        let receipt = harness.pipeline.issue(&flat_request("A")).await.unwrap();
        assert_eq!(receipt.record_id, Some(0));

        let verification = harness.pipeline.verify(None).await.unwrap();
        assert_eq!(verification.resolved.metadata(), Some(&receipt.metadata));
    }
}
