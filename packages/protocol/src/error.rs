use cosmwasm_std::StdError;
use thiserror::Error;

/// Machine-readable exit codes reported by both actors.
pub mod exit_code {
    /// Sender is not the identity the operation requires
    pub const ACCESS_DENIED: u32 = 100;
    /// Attached value does not cover the claim fee
    pub const NOT_ENOUGH_TON: u32 = 101;
    /// Claim throttle window has not elapsed
    pub const NOT_YET: u32 = 102;
    /// Requested native withdrawal exceeds the balance
    pub const INSUFFICIENT_BALANCE: u32 = 103;
    /// Integer does not fit the field it is stored in
    pub const RANGE_CHECK: u32 = 5;
    /// Body ended before a field could be read, or carried extra data
    pub const CELL_UNDERFLOW: u32 = 9;
    /// Opcode not handled by the receiving actor
    pub const UNKNOWN_OP: u32 = 0xffff;
    /// Host-level failure (storage, querier, address api)
    pub const HOST: u32 = 0xfffe;
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unknown opcode {op:#010x} (exit code {})", exit_code::UNKNOWN_OP)]
    UnknownOp { op: u32 },

    #[error("Cell underflow (exit code {})", exit_code::CELL_UNDERFLOW)]
    CellUnderflow {},

    #[error("Unexpected data after payload (exit code {})", exit_code::CELL_UNDERFLOW)]
    TrailingData {},

    #[error("Invalid address tag {tag:#04b} (exit code {})", exit_code::CELL_UNDERFLOW)]
    InvalidAddressTag { tag: u8 },

    #[error("Address is not valid UTF-8 (exit code {})", exit_code::CELL_UNDERFLOW)]
    InvalidAddress {},

    #[error("Address of {len} bytes does not fit (max 255, exit code {})", exit_code::RANGE_CHECK)]
    AddressTooLong { len: usize },

    #[error("Coins value does not fit 15 bytes (exit code {})", exit_code::RANGE_CHECK)]
    CoinsOverflow {},

    #[error("Coins length {len} has a leading zero byte (exit code {})", exit_code::RANGE_CHECK)]
    NonCanonicalCoins { len: usize },

    #[error("Cannot derive address: {reason}")]
    Derivation { reason: String },
}

impl ProtocolError {
    pub fn code(&self) -> u32 {
        match self {
            ProtocolError::UnknownOp { .. } => exit_code::UNKNOWN_OP,
            ProtocolError::CellUnderflow {}
            | ProtocolError::TrailingData {}
            | ProtocolError::InvalidAddressTag { .. }
            | ProtocolError::InvalidAddress {} => exit_code::CELL_UNDERFLOW,
            ProtocolError::AddressTooLong { .. }
            | ProtocolError::CoinsOverflow {}
            | ProtocolError::NonCanonicalCoins { .. } => {
                exit_code::RANGE_CHECK
            }
            ProtocolError::Std(_) | ProtocolError::Derivation { .. } => exit_code::HOST,
        }
    }
}
