//! # Address & Signer Resolution
//!
//! Discovers the node's managed accounts. Role assignment is positional:
//! index 0 admin, index 1 issuer, index 2 subject, with missing positions
//! falling back to index 0 (see [`shared_types::Roles::from_accounts`]).

use crate::client::NodeClient;
use crate::errors::LedgerError;
use crate::ports::SignerDirectory;
use async_trait::async_trait;
use shared_types::Address;
use tracing::debug;

/// Resolves signing identities from `eth_accounts`.
#[derive(Debug, Clone)]
pub struct AccountResolver {
    client: NodeClient,
}

impl AccountResolver {
    pub fn new(client: NodeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SignerDirectory for AccountResolver {
    async fn resolve_accounts(&self) -> Result<Vec<Address>, LedgerError> {
        let accounts = self.client.accounts().await?;
        if accounts.is_empty() {
            return Err(LedgerError::NoAccountsAvailable);
        }
        debug!(count = accounts.len(), "[cc-02] Resolved node accounts");
        Ok(accounts)
    }
}
