//! Adapters: HTTP JSON-RPC transport and the local-wallet typed capability.

pub mod http;
pub mod wallet;

pub use http::HttpTransport;
pub use wallet::{LocalWallet, WalletContract};
