//! # Shared Types Crate
//!
//! Ledger primitives and certificate entities shared by every subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Types that cross crate boundaries live here.
//! - **Hex on the wire**: Addresses, hashes and quantities serialize as
//!   `0x`-prefixed hex strings, matching the ledger node's JSON-RPC format.
//! - **Explicit roles**: Signing identities are carried as a [`Roles`] value
//!   instead of being re-derived from account positions at each call site.

pub mod entities;
pub mod primitives;

pub use entities::*;
pub use primitives::*;
