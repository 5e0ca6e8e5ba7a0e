//! # Receipt Polling
//!
//! Waits for a transaction by polling `eth_getTransactionReceipt` at a fixed
//! interval. No client-side deadline: a transaction that never lands keeps
//! the caller waiting until the transport itself fails.

use crate::client::NodeClient;
use crate::errors::LedgerError;
use crate::ports::Confirmation;
use async_trait::async_trait;
use shared_types::{Hash, TransactionReceipt};
use std::time::Duration;
use tracing::{debug, warn};

/// Polls the node until a receipt is available.
#[derive(Debug, Clone)]
pub struct ReceiptPoller {
    client: NodeClient,
    interval: Duration,
}

impl ReceiptPoller {
    pub fn new(client: NodeClient, interval: Duration) -> Self {
        Self { client, interval }
    }

    /// Resolves once the transaction is included.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Reverted`] when the receipt reports a failed
    /// execution; transport errors are propagated as-is.
    pub async fn wait(&self, hash: Hash) -> Result<TransactionReceipt, LedgerError> {
        let mut polls = 0u64;
        loop {
            if let Some(receipt) = self.client.transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    warn!(tx_hash = ?hash, "[cc-02] Transaction reverted");
                    return Err(LedgerError::Reverted { hash });
                }
                debug!(tx_hash = ?hash, polls, "[cc-02] Receipt available");
                return Ok(receipt);
            }
            polls += 1;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// A confirmation handle for `hash` backed by this poller.
    #[must_use]
    pub fn pending(&self, hash: Hash) -> PendingReceipt {
        PendingReceipt {
            poller: self.clone(),
            hash,
        }
    }
}

/// Confirmation handle returned alongside a typed invocation.
#[derive(Debug)]
pub struct PendingReceipt {
    poller: ReceiptPoller,
    hash: Hash,
}

#[async_trait]
impl Confirmation for PendingReceipt {
    async fn wait(self: Box<Self>) -> Result<TransactionReceipt, LedgerError> {
        self.poller.wait(self.hash).await
    }
}
