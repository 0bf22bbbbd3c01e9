use claim_protocol::{exit_code, ProtocolError};
use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    #[error("Access denied (exit code {})", exit_code::ACCESS_DENIED)]
    AccessDenied {},

    #[error("Claim fee is {required}, received {received} (exit code {})", exit_code::NOT_ENOUGH_TON)]
    NotEnoughTon {
        required: Uint128,
        received: Uint128,
    },

    #[error("Claim not yet available, next at {available_at} (exit code {})", exit_code::NOT_YET)]
    NotYet { available_at: u64 },

    #[error("Unknown reply id {id}")]
    UnknownReply { id: u64 },
}

impl ContractError {
    pub fn code(&self) -> u32 {
        match self {
            ContractError::AccessDenied {} => exit_code::ACCESS_DENIED,
            ContractError::NotEnoughTon { .. } => exit_code::NOT_ENOUGH_TON,
            ContractError::NotYet { .. } => exit_code::NOT_YET,
            ContractError::Overflow(_) => exit_code::RANGE_CHECK,
            ContractError::Protocol(err) => err.code(),
            ContractError::Std(_) | ContractError::UnknownReply { .. } => exit_code::HOST,
        }
    }
}
