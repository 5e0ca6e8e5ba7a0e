//! # Submission Paths
//!
//! The dual-path submitter of cc-02 exercised through whole issuances:
//! a typed capability that fails must fall back to the raw path exactly
//! once, and a local wallet must sign only for its own address.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{deployed_ledger, flat_request};
    use async_trait::async_trait;
    use cc_01_interface_codec::{CallRequest, Token};
    use cc_02_transaction_submission::adapters::LocalWallet;
    use cc_02_transaction_submission::ports::{TypedContract, TypedInvocation};
    use cc_02_transaction_submission::testing::{dev_accounts, InMemoryLedger};
    use cc_02_transaction_submission::{LedgerError, Submitter};
    use cc_03_metadata_store::InMemoryMetadataStore;
    use cc_04_certificate_pipeline::config::PipelineConfig;
    use cc_04_certificate_pipeline::testing::InMemoryPublisher;
    use cc_04_certificate_pipeline::{CertificatePipeline, PipelineError};
    use k256::ecdsa::SigningKey;
    use shared_types::{address_hex, Address};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const POLL: Duration = Duration::from_millis(1);

    /// Typed capability whose generated bindings lack every method.
    #[derive(Default)]
    struct UnboundContract {
        invocations: AtomicUsize,
    }

    #[async_trait]
    impl TypedContract for UnboundContract {
        async fn invoke(&self, _: Address, _: &CallRequest) -> Result<TypedInvocation, LedgerError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            Err(LedgerError::Unsupported("issueCertificate not bound".into()))
        }

        async fn read(&self, _: &CallRequest) -> Result<Vec<Token>, LedgerError> {
            Err(LedgerError::Unsupported("no read bindings".into()))
        }

        async fn deploy(&self, _: Address, _: &[u8]) -> Result<TypedInvocation, LedgerError> {
            Err(LedgerError::Unsupported("no deployer".into()))
        }
    }

    fn pipeline_with(ledger: Arc<InMemoryLedger>, submitter: Submitter) -> CertificatePipeline {
        let signers = submitter.account_resolver();
        let config = PipelineConfig {
            contract_address: ledger.contract().map(|address| address_hex(&address)),
            ..PipelineConfig::default()
        };
        CertificatePipeline::new(
            Arc::new(submitter),
            Arc::new(signers),
            Arc::new(InMemoryMetadataStore::new()),
            Arc::new(InMemoryPublisher::new()),
            config,
        )
    }

    fn random_wallet() -> LocalWallet {
        LocalWallet::new(SigningKey::random(&mut rand::thread_rng()))
    }

    // =========================================================================
    // CAPABILITY FALLBACK
    // =========================================================================

    #[tokio::test]
    async fn test_failing_capability_falls_back_once() {
        let ledger = Arc::new(deployed_ledger());
        let typed = Arc::new(UnboundContract::default());
        let submitter = Submitter::new(ledger.clone(), POLL).with_typed_contract(typed.clone());
        let pipeline = pipeline_with(ledger.clone(), submitter);

        let receipt = pipeline.issue(&flat_request("A")).await.unwrap();

        assert_eq!(typed.invocations.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.transactions_sent(), 1);
        assert_eq!(ledger.call_count("eth_sendTransaction"), 1);
        assert!(ledger.receipt(receipt.tx_hash).is_some());
        assert_eq!(ledger.certificates()[0].content_hash, receipt.content_hash);
        // Reads fell back too
        assert_eq!(receipt.record_id, Some(0));
    }

    #[tokio::test]
    async fn test_both_paths_failing_is_not_retried() {
        let ledger = Arc::new(deployed_ledger());
        ledger.fail_method("eth_sendTransaction");
        let typed = Arc::new(UnboundContract::default());
        let submitter = Submitter::new(ledger.clone(), POLL).with_typed_contract(typed.clone());
        let pipeline = pipeline_with(ledger.clone(), submitter);

        let err = pipeline.issue(&flat_request("A")).await.unwrap_err();

        assert!(matches!(err, PipelineError::SubmissionFailure(_)));
        assert_eq!(typed.invocations.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.call_count("eth_sendTransaction"), 1);
        assert!(ledger.certificates().is_empty());
    }

    // =========================================================================
    // LOCAL WALLET
    // =========================================================================

    #[tokio::test]
    async fn test_wallet_issuer_signs_locally() {
        let wallet = random_wallet();
        let issuer = wallet.address();
        let mut accounts = dev_accounts(3);
        accounts[1] = issuer;
        let ledger = Arc::new(deployed_ledger().with_accounts(accounts.clone()));
        let submitter = Submitter::new(ledger.clone(), POLL).with_wallet(wallet);
        assert!(submitter.has_typed_path());
        let pipeline = pipeline_with(ledger.clone(), submitter);

        let receipt = pipeline.issue(&flat_request("A")).await.unwrap();

        assert_eq!(ledger.call_count("eth_sendRawTransaction"), 1);
        assert_eq!(ledger.call_count("eth_sendTransaction"), 0);
        assert_eq!(receipt.issuer, issuer);
        assert_eq!(ledger.certificates()[0].issuer, issuer);
        assert_eq!(ledger.certificates()[0].subject, accounts[2]);
    }

    #[tokio::test]
    async fn test_wallet_nonces_follow_the_node() {
        let wallet = random_wallet();
        let mut accounts = dev_accounts(3);
        accounts[1] = wallet.address();
        let ledger = Arc::new(deployed_ledger().with_accounts(accounts));
        let pipeline = pipeline_with(
            ledger.clone(),
            Submitter::new(ledger.clone(), POLL).with_wallet(wallet),
        );

        for (expected, name) in ["A", "B", "C"].into_iter().enumerate() {
            let receipt = pipeline.issue(&flat_request(name)).await.unwrap();
            assert_eq!(receipt.record_id, Some(expected as u64));
        }
        assert_eq!(ledger.call_count("eth_sendRawTransaction"), 3);
    }

    #[tokio::test]
    async fn test_wallet_for_other_address_defers_to_node() {
        let ledger = Arc::new(deployed_ledger());
        let submitter = Submitter::new(ledger.clone(), POLL).with_wallet(random_wallet());
        let pipeline = pipeline_with(ledger.clone(), submitter);

        let receipt = pipeline.issue(&flat_request("A")).await.unwrap();

        assert_eq!(ledger.call_count("eth_sendRawTransaction"), 0);
        assert_eq!(ledger.call_count("eth_sendTransaction"), 1);
        assert_eq!(receipt.issuer, ledger.accounts()[1]);
    }

    // =========================================================================
    // DECODING
    // =========================================================================

    #[tokio::test]
    async fn test_issued_transaction_decodes_to_its_arguments() {
        let ledger = Arc::new(deployed_ledger());
        let pipeline = pipeline_with(ledger.clone(), Submitter::new(ledger.clone(), POLL));
        let receipt = pipeline.issue(&flat_request("A")).await.unwrap();

        let decoded = pipeline
            .decode_transaction(receipt.tx_hash)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(decoded.function, "issueCertificate");
        assert_eq!(
            decoded.arguments,
            vec![
                Token::Address(receipt.subject),
                Token::FixedBytes(receipt.content_hash),
                Token::uint(receipt.category_code),
            ]
        );
    }
}
