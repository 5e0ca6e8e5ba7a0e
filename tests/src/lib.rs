//! # Cert-Chain Test Suite
//!
//! Unified test crate for scenarios that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── issuance.rs      # publish → index → anchor, record ids, race window
//!     ├── verification.rs  # lookup, degraded reads, persistence across runs
//!     ├── submission.rs    # typed path, capability fallback, wallet signing
//!     └── gateway.rs       # HTTP facade over a live pipeline
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::submission::
//!
//! # Benchmarks
//! cargo bench -p cc-tests
//! ```

pub mod integration;
