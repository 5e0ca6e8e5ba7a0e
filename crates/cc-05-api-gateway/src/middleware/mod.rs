//! HTTP middleware.

pub mod cors;

pub use cors::{create_cors_layer, preflight_no_content};
