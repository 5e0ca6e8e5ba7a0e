//! # Local Wallet
//!
//! The typed contract-call capability backed by a locally held secp256k1
//! key. Transactions are legacy EIP-155 envelopes:
//!
//! ```text
//! signing hash = keccak256(rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0]))
//! raw          = rlp([nonce, gasPrice, gas, to, value, data, v, r, s])
//! v            = recovery_id + chainId * 2 + 35
//! ```
//!
//! The wallet can only sign for its own address. A call requested for any
//! other signer reports [`LedgerError::Unsupported`], which sends the
//! submitter down the node-managed raw path.

use crate::client::{NodeClient, TransactionRequest};
use crate::domain::confirm::ReceiptPoller;
use crate::errors::LedgerError;
use crate::ports::{TypedContract, TypedInvocation};
use async_trait::async_trait;
use cc_01_interface_codec::{decode_result, CallRequest, Token};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rlp::{Rlp, RlpStream};
use shared_types::{from_hex_data, keccak256, Address, Hash, U256};
use tracing::info;

// =============================================================================
// TRANSACTION ENVELOPE
// =============================================================================

/// Unsigned legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas: U256,
    /// `None` creates a contract.
    pub to: Option<Address>,
    pub value: U256,
    pub data: Vec<u8>,
}

impl LegacyTransaction {
    fn rlp_append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas);
        match &self.to {
            Some(to) => stream.append(to),
            None => stream.append_empty_data(),
        };
        stream.append(&self.value);
        stream.append(&self.data);
    }

    /// EIP-155 signing hash. `None` yields the pre-EIP-155 six-field form.
    #[must_use]
    pub fn signing_hash(&self, chain_id: Option<u64>) -> Hash {
        let mut stream = match chain_id {
            Some(_) => RlpStream::new_list(9),
            None => RlpStream::new_list(6),
        };
        self.rlp_append_body(&mut stream);
        if let Some(chain_id) = chain_id {
            stream.append(&chain_id);
            stream.append(&0u8);
            stream.append(&0u8);
        }
        keccak256(&stream.out())
    }
}

/// A parsed raw transaction and the address that signed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredTransaction {
    pub sender: Address,
    pub chain_id: Option<u64>,
    pub transaction: LegacyTransaction,
}

fn rlp_error(field: &str, err: rlp::DecoderError) -> LedgerError {
    LedgerError::Signing(format!("invalid raw transaction ({field}): {err}"))
}

/// Parses a signed legacy transaction and recovers its sender.
///
/// # Errors
///
/// [`LedgerError::Signing`] for malformed RLP or an unrecoverable signature.
pub fn recover_raw_transaction(raw: &[u8]) -> Result<RecoveredTransaction, LedgerError> {
    let rlp = Rlp::new(raw);
    let items = rlp.item_count().map_err(|e| rlp_error("item count", e))?;
    if !rlp.is_list() || items != 9 {
        return Err(LedgerError::Signing(format!(
            "legacy transaction must have 9 fields, got {items}"
        )));
    }

    let to_item = rlp.at(3).map_err(|e| rlp_error("to", e))?;
    let to = if to_item.is_empty() {
        None
    } else {
        Some(to_item.as_val::<Address>().map_err(|e| rlp_error("to", e))?)
    };

    let transaction = LegacyTransaction {
        nonce: rlp.val_at(0).map_err(|e| rlp_error("nonce", e))?,
        gas_price: rlp.val_at(1).map_err(|e| rlp_error("gasPrice", e))?,
        gas: rlp.val_at(2).map_err(|e| rlp_error("gas", e))?,
        to,
        value: rlp.val_at(4).map_err(|e| rlp_error("value", e))?,
        data: rlp.val_at(5).map_err(|e| rlp_error("data", e))?,
    };
    let v: u64 = rlp.val_at(6).map_err(|e| rlp_error("v", e))?;
    let r: U256 = rlp.val_at(7).map_err(|e| rlp_error("r", e))?;
    let s: U256 = rlp.val_at(8).map_err(|e| rlp_error("s", e))?;

    // v = 27/28 (pre-EIP-155) or recovery_id + chain_id * 2 + 35
    let (recovery, chain_id) = match v {
        27 | 28 => (v - 27, None),
        v if v >= 35 => ((v - 35) % 2, Some((v - 35) / 2)),
        other => return Err(LedgerError::Signing(format!("invalid v value: {other}"))),
    };

    let mut compact = [0u8; 64];
    r.to_big_endian(&mut compact[..32]);
    s.to_big_endian(&mut compact[32..]);
    let signature =
        Signature::from_slice(&compact).map_err(|e| LedgerError::Signing(e.to_string()))?;
    let recovery_id = RecoveryId::from_byte(recovery as u8)
        .ok_or_else(|| LedgerError::Signing("invalid recovery id".into()))?;

    let hash = transaction.signing_hash(chain_id);
    let key = VerifyingKey::recover_from_prehash(hash.as_bytes(), &signature, recovery_id)
        .map_err(|e| LedgerError::Signing(e.to_string()))?;

    Ok(RecoveredTransaction {
        sender: address_from_pubkey(&key),
        chain_id,
        transaction,
    })
}

/// Derives the ledger address of a public key.
#[must_use]
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    // Keccak256 of the uncompressed key without its 0x04 prefix; last 20 bytes
    let hash = keccak256(&encoded.as_bytes()[1..]);
    Address::from_slice(&hash.as_bytes()[12..])
}

// =============================================================================
// WALLET
// =============================================================================

/// A locally held signing key.
#[derive(Clone)]
pub struct LocalWallet {
    key: SigningKey,
    address: Address,
}

impl LocalWallet {
    pub fn new(key: SigningKey) -> Self {
        let address = address_from_pubkey(key.verifying_key());
        Self { key, address }
    }

    /// Parses a hex-encoded 32-byte secret key.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Signing`] for non-hex input or an invalid scalar.
    pub fn from_hex(secret: &str) -> Result<Self, LedgerError> {
        let bytes = from_hex_data(secret).map_err(|e| LedgerError::Signing(e.to_string()))?;
        let key = SigningKey::from_slice(&bytes)
            .map_err(|_| LedgerError::Signing("invalid secp256k1 secret key".into()))?;
        Ok(Self::new(key))
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Signs `tx` for `chain_id` and returns the raw RLP envelope.
    pub fn sign_transaction(
        &self,
        tx: &LegacyTransaction,
        chain_id: u64,
    ) -> Result<Vec<u8>, LedgerError> {
        let hash = tx.signing_hash(Some(chain_id));
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(hash.as_bytes())
            .map_err(|e| LedgerError::Signing(e.to_string()))?;

        let compact = signature.to_bytes();
        let v = u64::from(recovery_id.to_byte()) + chain_id * 2 + 35;

        let mut stream = RlpStream::new_list(9);
        tx.rlp_append_body(&mut stream);
        stream.append(&v);
        stream.append(&U256::from_big_endian(&compact[..32]));
        stream.append(&U256::from_big_endian(&compact[32..]));
        Ok(stream.out().to_vec())
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TYPED CONTRACT ADAPTER
// =============================================================================

/// Typed contract calls signed by a [`LocalWallet`] and sent raw.
#[derive(Debug, Clone)]
pub struct WalletContract {
    wallet: LocalWallet,
    client: NodeClient,
    poller: ReceiptPoller,
}

impl WalletContract {
    pub fn new(wallet: LocalWallet, client: NodeClient, poller: ReceiptPoller) -> Self {
        Self {
            wallet,
            client,
            poller,
        }
    }

    fn ensure_signer(&self, signer: Address) -> Result<(), LedgerError> {
        if signer == self.wallet.address() {
            Ok(())
        } else {
            Err(LedgerError::Unsupported(format!(
                "wallet {:?} cannot sign for {signer:?}",
                self.wallet.address()
            )))
        }
    }

    async fn send(&self, to: Option<Address>, data: Vec<u8>) -> Result<TypedInvocation, LedgerError> {
        let from = self.wallet.address();
        let estimate = TransactionRequest {
            from: Some(from),
            to,
            gas: None,
            data: Some(shared_types::to_hex_data(&data)),
        };

        let nonce = self.client.transaction_count(from).await?;
        let gas_price = self.client.gas_price().await?;
        let gas = self.client.estimate_gas(&estimate).await?;
        let chain_id = self.client.chain_id().await?;

        let tx = LegacyTransaction {
            nonce,
            gas_price,
            gas,
            to,
            value: U256::zero(),
            data,
        };
        let raw = self.wallet.sign_transaction(&tx, chain_id)?;
        let hash = self.client.send_raw_transaction(&raw).await?;
        info!(tx_hash = ?hash, %nonce, chain_id, "[cc-02] Signed transaction broadcast");

        Ok(TypedInvocation {
            hash,
            confirmation: Some(Box::new(self.poller.pending(hash))),
        })
    }
}

#[async_trait]
impl TypedContract for WalletContract {
    async fn invoke(
        &self,
        signer: Address,
        call: &CallRequest,
    ) -> Result<TypedInvocation, LedgerError> {
        self.ensure_signer(signer)?;
        self.send(Some(call.target), call.encode()?).await
    }

    async fn read(&self, call: &CallRequest) -> Result<Vec<Token>, LedgerError> {
        let data = call.encode()?;
        let request = TransactionRequest::call(Some(self.wallet.address()), call.target, &data);
        let returned = self.client.call_contract(&request).await?;
        Ok(decode_result(call.function, &returned)?)
    }

    async fn deploy(
        &self,
        signer: Address,
        bytecode: &[u8],
    ) -> Result<TypedInvocation, LedgerError> {
        self.ensure_signer(signer)?;
        self.send(None, bytecode.to_vec()).await
    }
}
