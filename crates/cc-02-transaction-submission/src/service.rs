//! # Submitter Service
//!
//! One [`TransactionSubmitter`] implementation that probes the typed
//! capability at call time and falls back to [`RawCallStrategy`].
//!
//! ```text
//! submit(signer, call)
//!   ├─ typed capability present? ── invoke ── wait (if handle) ── Ok
//!   │        │ any error
//!   │        ▼
//!   └─ raw: encode ── eth_sendTransaction ── poll receipt ────── Ok
//!                        │ error
//!                        ▼
//!               SubmissionFailure { preferred, broadcast, fallback }
//! ```
//!
//! A typed transaction that was broadcast but not confirmed still falls
//! back, so two transactions may reach the ledger. Its hash is logged at
//! `warn` and carried in `broadcast` for reconciliation.

use crate::adapters::http::HttpTransport;
use crate::adapters::wallet::{LocalWallet, WalletContract};
use crate::client::NodeClient;
use crate::config::SubmitterConfig;
use crate::domain::accounts::AccountResolver;
use crate::domain::confirm::ReceiptPoller;
use crate::domain::raw::RawCallStrategy;
use crate::errors::LedgerError;
use crate::ports::{JsonRpcTransport, TransactionSubmitter, TypedContract};
use async_trait::async_trait;
use cc_01_interface_codec::{CallRequest, Token};
use shared_types::{Address, Hash, TransactionOutcome, TransactionReceipt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Dual-path transaction submitter.
pub struct Submitter {
    client: NodeClient,
    typed: Option<Arc<dyn TypedContract>>,
    raw: RawCallStrategy,
    poller: ReceiptPoller,
}

impl Submitter {
    /// A submitter with no typed capability: every call takes the raw path.
    pub fn new(transport: Arc<dyn JsonRpcTransport>, poll_interval: Duration) -> Self {
        let client = NodeClient::new(transport);
        let poller = ReceiptPoller::new(client.clone(), poll_interval);
        let raw = RawCallStrategy::new(client.clone(), poller.clone());
        Self {
            client,
            typed: None,
            raw,
            poller,
        }
    }

    /// Builds the HTTP transport and, when a signer key is configured, the
    /// local-wallet capability.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Signing`] when the configured key is invalid.
    pub fn from_config(config: &SubmitterConfig) -> Result<Self, LedgerError> {
        let transport = HttpTransport::with_timeout(&config.rpc_url, config.request_timeout());
        let submitter = Self::new(Arc::new(transport), config.poll_interval());
        match &config.signer_key {
            Some(secret) => Ok(submitter.with_wallet(LocalWallet::from_hex(secret)?)),
            None => Ok(submitter),
        }
    }

    /// Installs a typed contract capability.
    #[must_use]
    pub fn with_typed_contract(mut self, typed: Arc<dyn TypedContract>) -> Self {
        self.typed = Some(typed);
        self
    }

    /// Installs a local wallet as the typed capability.
    #[must_use]
    pub fn with_wallet(self, wallet: LocalWallet) -> Self {
        info!(address = ?wallet.address(), "[cc-02] Local wallet enabled for typed calls");
        let contract = WalletContract::new(wallet, self.client.clone(), self.poller.clone());
        self.with_typed_contract(Arc::new(contract))
    }

    /// True when a typed capability is installed.
    #[must_use]
    pub fn has_typed_path(&self) -> bool {
        self.typed.is_some()
    }

    /// Account resolver over the same node connection.
    #[must_use]
    pub fn account_resolver(&self) -> AccountResolver {
        AccountResolver::new(self.client.clone())
    }

    #[must_use]
    pub fn client(&self) -> &NodeClient {
        &self.client
    }

    fn capability(&self) -> Result<&Arc<dyn TypedContract>, LedgerError> {
        self.typed
            .as_ref()
            .ok_or_else(|| LedgerError::Unsupported("no typed contract capability".into()))
    }

    async fn submit_typed(
        &self,
        signer: Address,
        call: &CallRequest,
    ) -> Result<TransactionOutcome, LedgerError> {
        let invocation = self.capability()?.invoke(signer, call).await?;
        let hash = invocation.hash;
        match invocation.confirmation {
            Some(confirmation) => match confirmation.wait().await {
                Ok(receipt) => Ok(TransactionOutcome::Confirmed { receipt }),
                Err(err) => {
                    warn!(
                        tx_hash = ?hash,
                        error = %err,
                        "[cc-02] Typed transaction broadcast but confirmation failed"
                    );
                    Err(LedgerError::Unconfirmed {
                        hash,
                        cause: Box::new(err),
                    })
                }
            },
            None => Ok(TransactionOutcome::Pending { hash }),
        }
    }

    async fn deploy_typed(
        &self,
        signer: Address,
        bytecode: &[u8],
    ) -> Result<TransactionReceipt, LedgerError> {
        let invocation = self.capability()?.deploy(signer, bytecode).await?;
        let hash = invocation.hash;
        let confirmed = match invocation.confirmation {
            Some(confirmation) => confirmation.wait().await,
            None => self.poller.wait(hash).await,
        };
        confirmed.map_err(|err| {
            warn!(tx_hash = ?hash, error = %err, "[cc-02] Typed deployment broadcast but confirmation failed");
            LedgerError::Unconfirmed {
                hash,
                cause: Box::new(err),
            }
        })
    }

    fn warn_duplicate(function: &str, broadcast: Option<Hash>, second: Hash) {
        if let Some(first) = broadcast {
            warn!(
                function,
                first_tx = ?first,
                second_tx = ?second,
                "[cc-02] Raw fallback sent after an unconfirmed typed broadcast; both may be included"
            );
        }
    }

    fn log_fallback(&self, function: &str, preferred: &LedgerError) {
        match preferred {
            LedgerError::Unsupported(reason) => {
                debug!(function, reason = %reason, "[cc-02] Using raw call path");
            }
            other => {
                warn!(function, error = %other, "[cc-02] Typed call failed, falling back to raw call");
            }
        }
    }
}

#[async_trait]
impl TransactionSubmitter for Submitter {
    async fn submit(
        &self,
        signer: Address,
        call: &CallRequest,
    ) -> Result<TransactionOutcome, LedgerError> {
        let preferred = match self.submit_typed(signer, call).await {
            Ok(outcome) => {
                info!(
                    function = call.name(),
                    tx_hash = ?outcome.hash(),
                    confirmed = outcome.is_confirmed(),
                    "[cc-02] Submitted via typed call"
                );
                return Ok(outcome);
            }
            Err(err) => err,
        };
        self.log_fallback(call.name(), &preferred);
        let broadcast = preferred.broadcast_hash();

        match self.raw.submit(signer, call).await {
            Ok(receipt) => {
                Self::warn_duplicate(call.name(), broadcast, receipt.transaction_hash);
                info!(
                    function = call.name(),
                    tx_hash = ?receipt.transaction_hash,
                    "[cc-02] Submitted via raw transaction"
                );
                Ok(TransactionOutcome::Confirmed { receipt })
            }
            Err(fallback) => {
                error!(
                    function = call.name(),
                    preferred = %preferred,
                    fallback = %fallback,
                    broadcast = ?broadcast,
                    "[cc-02] Submission failed on both paths"
                );
                Err(LedgerError::SubmissionFailure {
                    preferred: preferred.to_string(),
                    broadcast,
                    fallback: Box::new(fallback),
                })
            }
        }
    }

    async fn query(&self, call: &CallRequest) -> Result<Vec<Token>, LedgerError> {
        if let Ok(typed) = self.capability() {
            match typed.read(call).await {
                Ok(tokens) => return Ok(tokens),
                Err(err) => {
                    debug!(function = call.name(), error = %err, "[cc-02] Typed read failed, using raw call");
                }
            }
        }
        self.raw.query(call).await
    }

    async fn confirm(&self, outcome: TransactionOutcome) -> Result<TransactionReceipt, LedgerError> {
        match outcome {
            TransactionOutcome::Confirmed { receipt } if receipt.succeeded() => Ok(receipt),
            TransactionOutcome::Confirmed { receipt } => Err(LedgerError::Reverted {
                hash: receipt.transaction_hash,
            }),
            TransactionOutcome::Pending { hash } => self.poller.wait(hash).await,
        }
    }

    async fn deploy(
        &self,
        signer: Address,
        bytecode: &[u8],
    ) -> Result<TransactionReceipt, LedgerError> {
        let receipt = match self.deploy_typed(signer, bytecode).await {
            Ok(receipt) => receipt,
            Err(preferred) => {
                self.log_fallback("deploy", &preferred);
                let broadcast = preferred.broadcast_hash();
                let receipt = self
                    .raw
                    .deploy(signer, bytecode)
                    .await
                    .map_err(|fallback| LedgerError::SubmissionFailure {
                        preferred: preferred.to_string(),
                        broadcast,
                        fallback: Box::new(fallback),
                    })?;
                Self::warn_duplicate("deploy", broadcast, receipt.transaction_hash);
                receipt
            }
        };

        if receipt.contract_address.is_none() {
            return Err(LedgerError::MissingContractAddress {
                hash: receipt.transaction_hash,
            });
        }
        info!(
            contract = ?receipt.contract_address,
            tx_hash = ?receipt.transaction_hash,
            "[cc-02] Contract deployed"
        );
        Ok(receipt)
    }

    async fn transaction_input(&self, hash: Hash) -> Result<Option<Vec<u8>>, LedgerError> {
        self.client.transaction_input(hash).await
    }
}
