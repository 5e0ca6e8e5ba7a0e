//! Domain layer: signature table, typed values, call requests.

pub mod abi;
pub mod call;
pub mod token;
