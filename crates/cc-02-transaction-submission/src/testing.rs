//! # In-Memory Ledger Node
//!
//! A [`JsonRpcTransport`] that answers the `eth_*` subset this workspace
//! uses and simulates the certificate contract by decoding call-data
//! through the codec. Intended for tests; enable with `test-utils`.
//!
//! Knobs for failure scenarios:
//! - hide accounts ([`InMemoryLedger::with_accounts`])
//! - fail any RPC method ([`InMemoryLedger::fail_method`])
//! - revert the next transaction ([`InMemoryLedger::revert_next`])
//! - report receipts as pending for a few polls ([`InMemoryLedger::set_pending_polls`])
//! - let a foreign issuer land records right after the next issuance
//!   ([`InMemoryLedger::interleave_foreign_issuances`])

use crate::adapters::wallet::recover_raw_transaction;
use crate::errors::LedgerError;
use crate::ports::JsonRpcTransport;
use async_trait::async_trait;
use cc_01_interface_codec::codec::{certificate_to_tokens, encode_values};
use cc_01_interface_codec::domain::abi::{
    lookup_selector, AUTHORIZE_ENTITY, ISSUE_RECORD, READ_COUNT, READ_RECORD,
};
use cc_01_interface_codec::{decode_input, Token};
use parking_lot::Mutex;
use rlp::RlpStream;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::{
    from_hex_data, keccak256, to_hex_data, Address, CertificateTuple, Hash, TransactionReceipt,
    U256, U64,
};
use std::collections::{HashMap, HashSet};

/// Deterministic development accounts `0x…1001`, `0x…1002`, …
#[must_use]
pub fn dev_accounts(count: u64) -> Vec<Address> {
    (1..=count)
        .map(|n| Address::from_low_u64_be(0x1000 + n))
        .collect()
}

#[derive(Debug, Clone)]
struct StoredTransaction {
    from: Address,
    to: Option<Address>,
    input: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    #[serde(default)]
    from: Option<Address>,
    #[serde(default)]
    to: Option<Address>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: Vec<Address>,
    chain_id: u64,
    block_number: u64,
    contract: Option<Address>,
    admin: Option<Address>,
    authorized: HashSet<Address>,
    require_authorization: bool,
    certificates: Vec<CertificateTuple>,
    receipts: HashMap<Hash, TransactionReceipt>,
    transactions: HashMap<Hash, StoredTransaction>,
    nonces: HashMap<Address, u64>,
    pending_polls: u32,
    polls: HashMap<Hash, u32>,
    failing_methods: HashSet<String>,
    revert_next: bool,
    foreign_issuances: usize,
    calls: Vec<String>,
}

/// Simulated ledger node.
#[derive(Debug)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Address used by [`Self::with_contract`] in most tests.
    pub const CONTRACT: Address = Address([0xc0; 20]);

    /// Issuer address of records injected by foreign issuances.
    pub const FOREIGN_ISSUER: Address = Address([0xfe; 20]);

    /// Chain id reported by default.
    pub const CHAIN_ID: u64 = 1337;

    /// A node with three managed accounts and no contract.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                accounts: dev_accounts(3),
                chain_id: Self::CHAIN_ID,
                ..LedgerState::default()
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replaces the managed account list.
    #[must_use]
    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.state.lock().accounts = accounts;
        self
    }

    /// Treats `address` as an already deployed contract administered by
    /// the first account.
    #[must_use]
    pub fn with_contract(self, address: Address) -> Self {
        {
            let mut state = self.state.lock();
            state.contract = Some(address);
            state.admin = state.accounts.first().copied();
        }
        self
    }

    /// Rejects issuance from issuers the admin has not authorized.
    #[must_use]
    pub fn with_authorization_required(self) -> Self {
        self.state.lock().require_authorization = true;
        self
    }

    /// Every later call to `method` fails with a JSON-RPC error.
    pub fn fail_method(&self, method: &str) {
        self.state.lock().failing_methods.insert(method.to_string());
    }

    /// Clears failures set with [`Self::fail_method`].
    pub fn heal(&self) {
        self.state.lock().failing_methods.clear();
    }

    /// The next transaction is mined with status 0 and no state change.
    pub fn revert_next(&self) {
        self.state.lock().revert_next = true;
    }

    /// Receipts are reported as `null` this many times per hash.
    pub fn set_pending_polls(&self, polls: u32) {
        let mut state = self.state.lock();
        state.pending_polls = polls;
        state.polls.clear();
    }

    /// After the next successful issuance, `count` records from
    /// [`Self::FOREIGN_ISSUER`] land before anyone can read the count.
    pub fn interleave_foreign_issuances(&self, count: usize) {
        self.state.lock().foreign_issuances = count;
    }

    /// Appends a record directly, as if another client had issued it.
    pub fn inject_certificate(&self, certificate: CertificateTuple) -> u64 {
        let mut state = self.state.lock();
        state.certificates.push(certificate);
        state.certificates.len() as u64 - 1
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn accounts(&self) -> Vec<Address> {
        self.state.lock().accounts.clone()
    }

    #[must_use]
    pub fn contract(&self) -> Option<Address> {
        self.state.lock().contract
    }

    #[must_use]
    pub fn certificates(&self) -> Vec<CertificateTuple> {
        self.state.lock().certificates.clone()
    }

    #[must_use]
    pub fn is_authorized(&self, issuer: Address) -> bool {
        self.state.lock().authorized.contains(&issuer)
    }

    #[must_use]
    pub fn receipt(&self, hash: Hash) -> Option<TransactionReceipt> {
        self.state.lock().receipts.get(&hash).cloned()
    }

    /// Number of requests made for `method`.
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state.lock().calls.iter().filter(|m| *m == method).count()
    }

    /// Number of transactions sent by either submission method.
    #[must_use]
    pub fn transactions_sent(&self) -> usize {
        self.call_count("eth_sendTransaction") + self.call_count("eth_sendRawTransaction")
    }

    // -------------------------------------------------------------------------
    // Request handling
    // -------------------------------------------------------------------------

    fn dispatch(state: &mut LedgerState, method: &str, params: &Value) -> Result<Value, LedgerError> {
        match method {
            "eth_accounts" => Ok(json!(state.accounts)),
            "eth_chainId" => Ok(json!(U256::from(state.chain_id))),
            "eth_blockNumber" => Ok(json!(U256::from(state.block_number))),
            "eth_gasPrice" => Ok(json!(U256::from(1_000_000_000u64))),
            "eth_estimateGas" => Ok(json!(U256::from(200_000u64))),
            "eth_getTransactionCount" => {
                let address: Address = param(params, 0)?;
                Ok(json!(U256::from(state.nonce(address))))
            }
            "eth_sendTransaction" => {
                let call: CallParams = param(params, 0)?;
                let from = call.from.ok_or_else(|| rpc(-32602, "missing from"))?;
                if !state.accounts.contains(&from) {
                    return Err(rpc(-32000, "unknown account"));
                }
                let input = call_data(call.data.as_deref())?;
                let nonce = state.nonce(from);
                let mut preimage = from.as_bytes().to_vec();
                preimage.extend_from_slice(&nonce.to_be_bytes());
                preimage.extend_from_slice(&input);
                let hash = keccak256(&preimage);
                state.execute(hash, from, call.to, input);
                Ok(json!(hash))
            }
            "eth_sendRawTransaction" => {
                let raw_hex: String = param(params, 0)?;
                let raw = from_hex_data(&raw_hex).map_err(|e| rpc(-32602, &e.to_string()))?;
                let recovered =
                    recover_raw_transaction(&raw).map_err(|e| rpc(-32000, &e.to_string()))?;
                if recovered.chain_id != Some(state.chain_id) {
                    return Err(rpc(-32000, "invalid chain id"));
                }
                if recovered.transaction.nonce != U256::from(state.nonce(recovered.sender)) {
                    return Err(rpc(-32000, "nonce mismatch"));
                }
                let hash = keccak256(&raw);
                state.execute(
                    hash,
                    recovered.sender,
                    recovered.transaction.to,
                    recovered.transaction.data,
                );
                Ok(json!(hash))
            }
            "eth_call" => {
                let call: CallParams = param(params, 0)?;
                let input = call_data(call.data.as_deref())?;
                let returned = state.read(call.to, &input)?;
                Ok(json!(to_hex_data(&returned)))
            }
            "eth_getTransactionReceipt" => {
                let hash: Hash = param(params, 0)?;
                let pending_polls = state.pending_polls;
                let seen = state.polls.entry(hash).or_insert(0);
                if *seen < pending_polls {
                    *seen += 1;
                    return Ok(Value::Null);
                }
                Ok(state.receipts.get(&hash).map_or(Value::Null, |r| json!(r)))
            }
            "eth_getTransactionByHash" => {
                let hash: Hash = param(params, 0)?;
                Ok(state.transactions.get(&hash).map_or(Value::Null, |tx| {
                    json!({
                        "hash": hash,
                        "from": tx.from,
                        "to": tx.to,
                        "input": to_hex_data(&tx.input),
                    })
                }))
            }
            other => Err(rpc(-32601, &format!("method {other} not found"))),
        }
    }
}

#[async_trait]
impl JsonRpcTransport for InMemoryLedger {
    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let mut state = self.state.lock();
        state.calls.push(method.to_string());
        if state.failing_methods.contains(method) {
            return Err(rpc(-32603, &format!("{method} unavailable")));
        }
        Self::dispatch(&mut state, method, &params)
    }
}

impl LedgerState {
    fn nonce(&self, address: Address) -> u64 {
        self.nonces.get(&address).copied().unwrap_or(0)
    }

    fn execute(&mut self, hash: Hash, from: Address, to: Option<Address>, input: Vec<u8>) {
        let nonce = self.nonce(from);
        self.nonces.insert(from, nonce + 1);
        self.block_number += 1;

        let mut receipt = TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(self.block_number)),
            status: Some(U64::one()),
            contract_address: None,
            from: Some(from),
        };

        let succeeded = if std::mem::take(&mut self.revert_next) {
            false
        } else {
            match to {
                None => {
                    let address = creation_address(from, nonce);
                    self.contract = Some(address);
                    self.admin = Some(from);
                    self.authorized.clear();
                    self.certificates.clear();
                    receipt.contract_address = Some(address);
                    true
                }
                Some(target) => self.apply(from, target, &input),
            }
        };
        if !succeeded {
            receipt.status = Some(U64::zero());
        }

        self.receipts.insert(hash, receipt);
        self.transactions
            .insert(hash, StoredTransaction { from, to, input });
    }

    /// Applies a contract call. Returns false when execution reverts.
    fn apply(&mut self, from: Address, target: Address, input: &[u8]) -> bool {
        if Some(target) != self.contract {
            // Plain value transfer to a non-contract account
            return true;
        }
        let Some(function) = selector(input).and_then(lookup_selector) else {
            return false;
        };
        let Ok(args) = decode_input(function, input) else {
            return false;
        };

        if function.name == AUTHORIZE_ENTITY.name {
            let Some(entity) = args[0].as_address() else {
                return false;
            };
            if Some(from) != self.admin {
                return false;
            }
            self.authorized.insert(entity);
            true
        } else if function.name == ISSUE_RECORD.name {
            if self.require_authorization && !self.authorized.contains(&from) {
                return false;
            }
            let (Some(subject), Some(content_hash), Some(category)) =
                (args[0].as_address(), args[1].as_hash(), args[2].as_uint())
            else {
                return false;
            };
            self.certificates.push(CertificateTuple {
                issuer: from,
                subject,
                category: category.low_u32() as u8,
                content_hash,
            });
            for n in 0..std::mem::take(&mut self.foreign_issuances) {
                self.certificates.push(CertificateTuple {
                    issuer: InMemoryLedger::FOREIGN_ISSUER,
                    subject: InMemoryLedger::FOREIGN_ISSUER,
                    category: 0,
                    content_hash: keccak256(format!("foreign-{n}").as_bytes()),
                });
            }
            true
        } else {
            true
        }
    }

    /// Executes a read-only call and returns the raw return bytes.
    fn read(&self, to: Option<Address>, input: &[u8]) -> Result<Vec<u8>, LedgerError> {
        if to.is_none() || to != self.contract {
            // Calls to accounts without code return no data
            return Ok(Vec::new());
        }
        let Some(function) = selector(input).and_then(lookup_selector) else {
            return Err(rpc(3, "execution reverted"));
        };
        let args = decode_input(function, input).map_err(|_| rpc(3, "execution reverted"))?;

        if function.name == READ_COUNT.name {
            let count = Token::uint(self.certificates.len() as u64);
            Ok(encode_values(&READ_COUNT, READ_COUNT.outputs, &[count])?)
        } else if function.name == READ_RECORD.name {
            let id = args[0].as_uint().unwrap_or_default();
            let index = usize::try_from(id.low_u64()).unwrap_or(usize::MAX);
            let certificate = (id.bits() <= 64)
                .then(|| self.certificates.get(index))
                .flatten()
                .ok_or_else(|| rpc(3, "execution reverted: certificate does not exist"))?;
            let tokens = certificate_to_tokens(certificate);
            Ok(encode_values(&READ_RECORD, READ_RECORD.outputs, &tokens)?)
        } else {
            Ok(Vec::new())
        }
    }
}

fn selector(input: &[u8]) -> Option<[u8; 4]> {
    input.get(..4).and_then(|bytes| bytes.try_into().ok())
}

fn creation_address(from: Address, nonce: u64) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(&from);
    stream.append(&nonce);
    let hash = keccak256(&stream.out());
    Address::from_slice(&hash.as_bytes()[12..])
}

fn call_data(data: Option<&str>) -> Result<Vec<u8>, LedgerError> {
    data.map_or(Ok(Vec::new()), |hex| {
        from_hex_data(hex).map_err(|e| rpc(-32602, &e.to_string()))
    })
}

fn param<T: DeserializeOwned>(params: &Value, index: usize) -> Result<T, LedgerError> {
    let value = params
        .get(index)
        .cloned()
        .ok_or_else(|| rpc(-32602, &format!("missing parameter {index}")))?;
    serde_json::from_value(value).map_err(|e| rpc(-32602, &e.to_string()))
}

fn rpc(code: i64, message: &str) -> LedgerError {
    LedgerError::Rpc {
        code,
        message: message.to_string(),
    }
}
