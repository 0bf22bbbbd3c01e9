// Shared wire protocol for the claim Vault and its per-user Proxy contracts

pub mod address;
pub mod cell;
pub mod error;
pub mod message;
pub mod msg;
pub mod op;

pub use address::{derive_proxy_address, ProxyInitState};
pub use error::{exit_code, ProtocolError};
pub use message::{decode, encode, ActorMessage, Envelope, ProxyMsg, VaultMsg};

/// Protocol revision implemented by this workspace. Earlier drafts without
/// `deposit`, `first_claim`, `boost` or the split withdrawals are superseded.
pub const PROTOCOL_VERSION: &str = "claim-v4";

/// Minimum interval between two successful claims of the same user (seconds)
pub const CLAIM_INTERVAL: u64 = 86_400;

/// Tokens granted per claim by a freshly deployed Proxy
pub const DEFAULT_CLAIM_AMOUNT: u128 = 1_000_000;

// Common helper functions

/// Check whether the claim throttle has elapsed. `last_claim == 0` means no prior claim.
pub fn claim_available(now: u64, last_claim: u64) -> bool {
    last_claim == 0 || now.saturating_sub(last_claim) >= CLAIM_INTERVAL
}

/// Earliest timestamp at which the next claim is accepted
pub fn next_claim_at(last_claim: u64) -> u64 {
    if last_claim == 0 {
        0
    } else {
        last_claim.saturating_add(CLAIM_INTERVAL)
    }
}
