//! # Raw Call Strategy
//!
//! The fallback path: encode through the codec, let the node sign with a
//! managed account via `eth_sendTransaction`, then poll for the receipt.

use super::confirm::ReceiptPoller;
use crate::client::{NodeClient, TransactionRequest};
use crate::errors::LedgerError;
use cc_01_interface_codec::{decode_result, CallRequest, Token};
use shared_types::{Address, TransactionReceipt};
use tracing::{debug, info};

/// Protocol-level call mechanism that needs nothing from the runtime.
#[derive(Debug, Clone)]
pub struct RawCallStrategy {
    client: NodeClient,
    poller: ReceiptPoller,
}

impl RawCallStrategy {
    pub fn new(client: NodeClient, poller: ReceiptPoller) -> Self {
        Self { client, poller }
    }

    /// Sends `call` as `signer` and waits for its receipt.
    pub async fn submit(
        &self,
        signer: Address,
        call: &CallRequest,
    ) -> Result<TransactionReceipt, LedgerError> {
        let data = call.encode()?;
        let request = TransactionRequest::call(Some(signer), call.target, &data);
        let hash = self.client.send_transaction(&request).await?;
        info!(
            function = call.name(),
            tx_hash = ?hash,
            "[cc-02] Raw transaction sent, awaiting receipt"
        );
        self.poller.wait(hash).await
    }

    /// Encodes `call`, runs it through `eth_call` and decodes the outputs.
    pub async fn query(&self, call: &CallRequest) -> Result<Vec<Token>, LedgerError> {
        let data = call.encode()?;
        let request = TransactionRequest::call(None, call.target, &data);
        let returned = self.client.call_contract(&request).await?;
        debug!(
            function = call.name(),
            bytes = returned.len(),
            "[cc-02] Raw call returned"
        );
        Ok(decode_result(call.function, &returned)?)
    }

    /// Sends a contract-creation transaction as `signer`.
    pub async fn deploy(
        &self,
        signer: Address,
        bytecode: &[u8],
    ) -> Result<TransactionReceipt, LedgerError> {
        let hash = self
            .client
            .send_transaction(&TransactionRequest::create(signer, bytecode))
            .await?;
        info!(tx_hash = ?hash, "[cc-02] Deployment sent, awaiting receipt");
        self.poller.wait(hash).await
    }
}
