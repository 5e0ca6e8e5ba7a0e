//! Domain layer: request normalization and pipeline results.

pub mod outcome;
pub mod request;
