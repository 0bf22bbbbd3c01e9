pub mod contract;
mod error;
pub mod msg;
pub mod state;
pub mod token;

#[cfg(test)]
mod multitest;

pub use crate::error::ContractError;
