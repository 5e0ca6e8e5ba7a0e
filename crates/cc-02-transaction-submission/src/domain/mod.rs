//! Domain layer: confirmation polling, the raw call strategy, role resolution.

pub mod accounts;
pub mod confirm;
pub mod raw;
