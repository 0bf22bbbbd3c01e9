use claim_protocol::{exit_code, ProtocolError};
use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    #[error("Access denied (exit code {})", exit_code::ACCESS_DENIED)]
    AccessDenied {},

    #[error("Requested {requested}, balance is {available} (exit code {})", exit_code::INSUFFICIENT_BALANCE)]
    InsufficientBalance {
        available: Uint128,
        requested: Uint128,
    },

    #[error("Proxy code checksum must be 32 bytes")]
    InvalidChecksum {},

    #[error("Unknown reply id {id}")]
    UnknownReply { id: u64 },
}

impl ContractError {
    pub fn code(&self) -> u32 {
        match self {
            ContractError::AccessDenied {} => exit_code::ACCESS_DENIED,
            ContractError::InsufficientBalance { .. } => exit_code::INSUFFICIENT_BALANCE,
            ContractError::InvalidChecksum {} => exit_code::RANGE_CHECK,
            ContractError::Protocol(err) => err.code(),
            ContractError::Std(_) | ContractError::UnknownReply { .. } => exit_code::HOST,
        }
    }
}
