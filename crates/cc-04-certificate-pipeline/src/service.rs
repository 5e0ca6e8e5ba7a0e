//! # Certificate Pipeline Service
//!
//! Orchestrates issuance and verification across the publisher, the
//! metadata index and the ledger.
//!
//! ```text
//! issue(request)
//!   normalize ── resolve roles + contract ── publish ── keccak(locator)
//!       │                                                   │
//!       │ Validation (no I/O yet)                            ▼
//!       ▼                                   index put (soft) ── submit ── confirm ── count - 1
//!    error
//!
//! verify(id?)
//!   count - 1 (if no id) ── read record ── index get ─┬─ Metadata
//!                                                     └─ OnChain (degraded)
//! ```
//!
//! The metadata index is written before the ledger submission. A failed
//! submission can therefore leave an orphaned index entry; a confirmed
//! record never lacks one unless the index write itself failed.

use crate::config::PipelineConfig;
use crate::deployment::{resolve_contract_address, save_deployment};
use crate::domain::outcome::{
    DecodedCall, IssuanceReceipt, ResolvedRecord, RunContext, Verification,
};
use crate::domain::request::{IssueRequest, NormalizedIssue};
use crate::errors::PipelineError;
use crate::ports::ContentPublisher;
use cc_01_interface_codec::codec::{certificate_from_tokens, count_from_tokens};
use cc_01_interface_codec::domain::abi::lookup_selector;
use cc_01_interface_codec::{decode_input, CallRequest, CodecError};
use cc_02_transaction_submission::{SignerDirectory, TransactionSubmitter};
use cc_03_metadata_store::{MetadataStore, PutOutcome};
use chrono::Utc;
use shared_types::{
    keccak256, Address, DeploymentRecord, Hash, TransactionOutcome, TransactionReceipt, U256,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Issuance, verification and administration over one ledger contract.
pub struct CertificatePipeline {
    submitter: Arc<dyn TransactionSubmitter>,
    signers: Arc<dyn SignerDirectory>,
    store: Arc<dyn MetadataStore>,
    publisher: Arc<dyn ContentPublisher>,
    config: PipelineConfig,
}

impl CertificatePipeline {
    pub fn new(
        submitter: Arc<dyn TransactionSubmitter>,
        signers: Arc<dyn SignerDirectory>,
        store: Arc<dyn MetadataStore>,
        publisher: Arc<dyn ContentPublisher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            submitter,
            signers,
            store,
            publisher,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // =========================================================================
    // RUN CONTEXT
    // =========================================================================

    /// Contract address from the override or the deployment record.
    pub async fn contract_address(&self) -> Result<Address, PipelineError> {
        resolve_contract_address(
            self.config.contract_address.as_deref(),
            &self.config.deploy_record_path,
        )
        .await
    }

    /// Resolves signing roles and the contract once for a run.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NoAccountsAvailable`] or
    /// [`PipelineError::ContractAddressUnresolved`].
    pub async fn prepare(&self) -> Result<RunContext, PipelineError> {
        let roles = self.signers.resolve_roles().await?;
        let contract = self.contract_address().await?;
        debug!(
            admin = ?roles.admin,
            issuer = ?roles.issuer,
            contract = ?contract,
            "[cc-04] Run context resolved"
        );
        Ok(RunContext { roles, contract })
    }

    // =========================================================================
    // ISSUANCE
    // =========================================================================

    /// Validates, publishes, indexes and anchors one certificate.
    ///
    /// Validation runs before any network call, so an incomplete request
    /// never reaches the publisher or the ledger.
    pub async fn issue(&self, request: &IssueRequest) -> Result<IssuanceReceipt, PipelineError> {
        let issue = request.normalize(&self.config.defaults)?;
        let context = self.prepare().await?;
        self.issue_with(&context, issue).await
    }

    /// Issuance with an already resolved run context.
    pub async fn issue_with(
        &self,
        context: &RunContext,
        issue: NormalizedIssue,
    ) -> Result<IssuanceReceipt, PipelineError> {
        let NormalizedIssue {
            metadata,
            subject,
            category_code,
        } = issue;

        let content_locator = self.publisher.publish(&metadata).await?;
        let content_hash = keccak256(content_locator.as_bytes());
        info!(
            locator = %content_locator,
            content_hash = ?content_hash,
            "[cc-04] Metadata published"
        );

        // Indexed before submission so a pending record still resolves
        self.index(&content_hash, &metadata).await;

        let subject = subject.unwrap_or(context.roles.subject);
        let call = CallRequest::issue_record(context.contract, subject, content_hash, category_code);
        let outcome = self.submitter.submit(context.roles.issuer, &call).await?;
        let receipt = self.submitter.confirm(outcome).await?;
        let tx_hash = receipt.transaction_hash;

        let record_id = match self.record_count(context.contract).await {
            Ok(count) => Some(count.saturating_sub(1)),
            Err(err) => {
                warn!(tx_hash = ?tx_hash, error = %err, "[cc-04] Issued, but record count unavailable");
                None
            }
        };

        info!(
            tx_hash = ?tx_hash,
            record_id = ?record_id,
            subject = ?subject,
            "[cc-04] Certificate issued"
        );

        Ok(IssuanceReceipt {
            contract: context.contract,
            tx_hash,
            record_id,
            content_locator,
            content_hash,
            metadata,
            issuer: context.roles.issuer,
            subject,
            category_code,
            outcome: TransactionOutcome::Confirmed { receipt },
        })
    }

    async fn index(&self, hash: &Hash, metadata: &shared_types::MetadataRecord) {
        match self.store.put(hash, metadata).await {
            Ok(PutOutcome::Inserted) => debug!(content_hash = ?hash, "[cc-04] Metadata indexed"),
            Ok(PutOutcome::AlreadyPresent) => {
                debug!(content_hash = ?hash, "[cc-04] Metadata already indexed, kept existing entry");
            }
            Err(err) => {
                warn!(content_hash = ?hash, error = %err, "[cc-04] Metadata index write failed, continuing");
            }
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Total number of records held by `contract`.
    pub async fn record_count(&self, contract: Address) -> Result<u64, PipelineError> {
        let tokens = self.submitter.query(&CallRequest::read_count(contract)).await?;
        let count = count_from_tokens(&tokens)?;
        if count > U256::from(u64::MAX) {
            return Err(PipelineError::MalformedResult(CodecError::MalformedResult {
                function: "totalCertificates".into(),
                reason: format!("count {count} exceeds u64"),
            }));
        }
        Ok(count.low_u64())
    }

    /// Id of the most recent record, `None` when there are none.
    pub async fn latest_record_id(&self, contract: Address) -> Result<Option<u64>, PipelineError> {
        let count = self.record_count(contract).await?;
        Ok(count.checked_sub(1))
    }

    /// Verifies record `record_id`, or the latest record when `None`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NoRecords`] when no id is given and the contract is
    /// empty. Missing metadata is never an error.
    pub async fn verify(&self, record_id: Option<u64>) -> Result<Verification, PipelineError> {
        let contract = self.contract_address().await?;
        let record_id = match record_id {
            Some(id) => id,
            None => self
                .latest_record_id(contract)
                .await?
                .ok_or(PipelineError::NoRecords)?,
        };
        self.verify_at(contract, record_id).await
    }

    /// Verifies one record of `contract`.
    pub async fn verify_at(
        &self,
        contract: Address,
        record_id: u64,
    ) -> Result<Verification, PipelineError> {
        let tokens = self
            .submitter
            .query(&CallRequest::read_record(contract, record_id))
            .await?;
        let certificate = certificate_from_tokens(&tokens)?;

        let resolved = match self.store.get(&certificate.content_hash).await {
            Ok(Some(record)) => ResolvedRecord::Metadata(record),
            Ok(None) => {
                info!(
                    record_id,
                    content_hash = ?certificate.content_hash,
                    "[cc-04] No indexed metadata, returning on-chain record"
                );
                ResolvedRecord::OnChain(certificate)
            }
            Err(err) => {
                warn!(record_id, error = %err, "[cc-04] Metadata index read failed, returning on-chain record");
                ResolvedRecord::OnChain(certificate)
            }
        };

        Ok(Verification {
            record_id,
            certificate,
            resolved,
        })
    }

    /// Decodes a transaction's input against the contract surface.
    ///
    /// `Ok(None)` when the node does not know the transaction.
    pub async fn decode_transaction(&self, hash: Hash) -> Result<Option<DecodedCall>, PipelineError> {
        let Some(input) = self.submitter.transaction_input(hash).await? else {
            return Ok(None);
        };
        let selector: [u8; 4] = input
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| CodecError::MalformedResult {
                function: "transaction input".into(),
                reason: format!("expected at least 4 bytes, got {}", input.len()),
            })?;
        let function = lookup_selector(selector)
            .ok_or_else(|| CodecError::UnknownFunction(format!("0x{}", hex_selector(selector))))?;
        let arguments = decode_input(function, &input)?;
        Ok(Some(DecodedCall {
            function: function.name,
            arguments,
        }))
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Authorizes the issuer role on the contract, signed by the admin.
    pub async fn authorize_issuer(
        &self,
        context: &RunContext,
    ) -> Result<TransactionReceipt, PipelineError> {
        let call = CallRequest::authorize_entity(context.contract, context.roles.issuer);
        let outcome = self.submitter.submit(context.roles.admin, &call).await?;
        let receipt = self.submitter.confirm(outcome).await?;
        info!(
            issuer = ?context.roles.issuer,
            tx_hash = ?receipt.transaction_hash,
            "[cc-04] Issuer authorized"
        );
        Ok(receipt)
    }

    /// Deploys the contract from the admin identity and records where it went.
    pub async fn deploy(&self, bytecode: &[u8]) -> Result<DeploymentRecord, PipelineError> {
        let roles = self.signers.resolve_roles().await?;
        deploy_contract(
            self.submitter.as_ref(),
            roles.admin,
            bytecode,
            &self.config.deploy_record_path,
            &self.config.network,
        )
        .await
    }
}

/// Deploys contract bytecode as `signer` and writes the deployment record.
///
/// A record that cannot be written is logged; the deployment still succeeds.
pub async fn deploy_contract(
    submitter: &dyn TransactionSubmitter,
    signer: Address,
    bytecode: &[u8],
    record_path: &Path,
    network: &str,
) -> Result<DeploymentRecord, PipelineError> {
    let receipt = submitter.deploy(signer, bytecode).await?;
    let address = receipt
        .contract_address
        .ok_or(cc_02_transaction_submission::LedgerError::MissingContractAddress {
            hash: receipt.transaction_hash,
        })?;

    let record = DeploymentRecord {
        address,
        network: Some(network.to_string()),
        timestamp: Utc::now(),
    };
    match save_deployment(record_path, &record).await {
        Ok(()) => info!(
            address = ?address,
            path = %record_path.display(),
            "[cc-04] Contract deployed"
        ),
        Err(err) => warn!(
            address = ?address,
            path = %record_path.display(),
            error = %err,
            "[cc-04] Contract deployed, but the deployment record was not written"
        ),
    }
    Ok(record)
}

fn hex_selector(selector: [u8; 4]) -> String {
    selector.iter().map(|b| format!("{b:02x}")).collect()
}
