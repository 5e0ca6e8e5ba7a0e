//! Adapters for the outbound ports.

pub mod pinata;

pub use pinata::PinataPublisher;
