//! Ports.

pub mod outbound;

pub use outbound::ContentPublisher;
