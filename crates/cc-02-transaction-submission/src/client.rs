//! # Node Client
//!
//! Typed helpers over the raw JSON-RPC transport. Every method maps one
//! `eth_*` call; quantities and byte strings are hex-encoded on the wire.

use crate::errors::LedgerError;
use crate::ports::JsonRpcTransport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{from_hex_data, to_hex_data, Address, Hash, TransactionReceipt, U256};
use std::sync::Arc;

/// Transaction object for `eth_sendTransaction`, `eth_estimateGas` and `eth_call`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Absent for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    /// `0x`-prefixed hex call-data or init code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl TransactionRequest {
    /// A contract call from `from` to `to`.
    #[must_use]
    pub fn call(from: Option<Address>, to: Address, data: &[u8]) -> Self {
        Self {
            from,
            to: Some(to),
            gas: None,
            data: Some(to_hex_data(data)),
        }
    }

    /// A contract-creation transaction.
    #[must_use]
    pub fn create(from: Address, bytecode: &[u8]) -> Self {
        Self {
            from: Some(from),
            to: None,
            gas: None,
            data: Some(to_hex_data(bytecode)),
        }
    }
}

/// Subset of `eth_getTransactionByHash` this crate reads.
#[derive(Debug, Clone, Deserialize)]
struct TransactionView {
    input: String,
}

/// Typed JSON-RPC client. Cheap to clone.
#[derive(Clone)]
pub struct NodeClient {
    transport: Arc<dyn JsonRpcTransport>,
}

impl NodeClient {
    pub fn new(transport: Arc<dyn JsonRpcTransport>) -> Self {
        Self { transport }
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, LedgerError> {
        let result = self.transport.request(method, params).await?;
        serde_json::from_value(result).map_err(|e| LedgerError::invalid(method, e))
    }

    /// `eth_accounts`
    pub async fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        self.call("eth_accounts", json!([])).await
    }

    /// `eth_chainId`
    pub async fn chain_id(&self) -> Result<u64, LedgerError> {
        let id: U256 = self.call("eth_chainId", json!([])).await?;
        if id > U256::from(u64::MAX) {
            return Err(LedgerError::invalid("eth_chainId", "chain id exceeds 64 bits"));
        }
        Ok(id.low_u64())
    }

    /// `eth_gasPrice`
    pub async fn gas_price(&self) -> Result<U256, LedgerError> {
        self.call("eth_gasPrice", json!([])).await
    }

    /// `eth_getTransactionCount` against the pending block.
    pub async fn transaction_count(&self, address: Address) -> Result<U256, LedgerError> {
        self.call("eth_getTransactionCount", json!([address, "pending"]))
            .await
    }

    /// `eth_estimateGas`
    pub async fn estimate_gas(&self, request: &TransactionRequest) -> Result<U256, LedgerError> {
        self.call("eth_estimateGas", json!([request])).await
    }

    /// `eth_sendTransaction`: the node signs with one of its managed accounts.
    pub async fn send_transaction(&self, request: &TransactionRequest) -> Result<Hash, LedgerError> {
        self.call("eth_sendTransaction", json!([request])).await
    }

    /// `eth_sendRawTransaction`
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<Hash, LedgerError> {
        self.call("eth_sendRawTransaction", json!([to_hex_data(raw)]))
            .await
    }

    /// `eth_call` against the latest block; returns the raw return bytes.
    pub async fn call_contract(&self, request: &TransactionRequest) -> Result<Vec<u8>, LedgerError> {
        let data: String = self.call("eth_call", json!([request, "latest"])).await?;
        from_hex_data(&data).map_err(|e| LedgerError::invalid("eth_call", e))
    }

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    pub async fn transaction_receipt(
        &self,
        hash: Hash,
    ) -> Result<Option<TransactionReceipt>, LedgerError> {
        self.call("eth_getTransactionReceipt", json!([hash])).await
    }

    /// Input data of a transaction via `eth_getTransactionByHash`.
    pub async fn transaction_input(&self, hash: Hash) -> Result<Option<Vec<u8>>, LedgerError> {
        let view: Option<TransactionView> =
            self.call("eth_getTransactionByHash", json!([hash])).await?;
        view.map(|tx| {
            from_hex_data(&tx.input).map_err(|e| LedgerError::invalid("eth_getTransactionByHash", e))
        })
        .transpose()
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_omits_absent_fields() {
        let request = TransactionRequest::call(None, Address::repeat_byte(0x01), &[0xab, 0xcd]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "to": format!("0x{}", "01".repeat(20)), "data": "0xabcd" })
        );
    }

    #[test]
    fn test_create_request_has_no_target() {
        let request = TransactionRequest::create(Address::zero(), &[0x60]);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("to").is_none());
        assert_eq!(value["data"], "0x60");
    }
}
