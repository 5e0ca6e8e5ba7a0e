//! Ports: the submitter's API and the capabilities it depends on.

pub mod inbound;
pub mod outbound;

pub use inbound::{SignerDirectory, TransactionSubmitter};
pub use outbound::{Confirmation, JsonRpcTransport, TypedContract, TypedInvocation};
