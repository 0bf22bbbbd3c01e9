//! 32-bit operation codes.
//!
//! Delivery classes, as seen from the sender:
//! - `CLAIM` forwarded Proxy -> Vault, `BOOST` and `WITHDRAW_EMERGENCY` forwarded
//!   Vault -> Proxy and token `TRANSFER`s are fire-and-forget: at most once, a bounce is recorded by the
//!   sender and its own committed state is kept.
//! - `DEPLOY_PROXY`, `WITHDRAW_NATIVE` and native sweeps of `WITHDRAW_EMERGENCY`
//!   are atomic with the message that issued them.
//! - Everything a user or the admin sends directly executes exactly once or aborts.

pub const CLAIM: u32 = 0xa769de27;
pub const FIRST_CLAIM: u32 = 0x862ad82d;
pub const BOOST: u32 = 0x56642768;
pub const DEPOSIT: u32 = 0x4d6a3f2e;
pub const DEPLOY_PROXY: u32 = 0x1f04537a;
pub const WITHDRAW_NATIVE: u32 = 0x37726bdb;
pub const WITHDRAW_TOKEN: u32 = 0x11c09682;
pub const WITHDRAW_EMERGENCY: u32 = 0x781282d4;
pub const WITHDRAW_PROXY_EMERGENCY: u32 = 0x5e2c7b19;

// token sub-protocol
pub const TRANSFER: u32 = 0x0f8a7ea5;
pub const TRANSFER_NOTIFICATION: u32 = 0x7362d09c;
pub const INTERNAL_TRANSFER: u32 = 0x178d4519;
pub const EXCESS: u32 = 0xd53276db;
pub const BURN: u32 = 0x595f07bc;
pub const BURN_NOTIFICATION: u32 = 0x7bdd97de;

/// Human-readable name for attributes and logs
pub fn name(op: u32) -> Option<&'static str> {
    let name = match op {
        CLAIM => "claim",
        FIRST_CLAIM => "first_claim",
        BOOST => "boost",
        DEPOSIT => "deposit",
        DEPLOY_PROXY => "deploy_proxy",
        WITHDRAW_NATIVE => "withdraw_native",
        WITHDRAW_TOKEN => "withdraw_token",
        WITHDRAW_EMERGENCY => "withdraw_emergency",
        WITHDRAW_PROXY_EMERGENCY => "withdraw_proxy_emergency",
        TRANSFER => "transfer",
        TRANSFER_NOTIFICATION => "transfer_notification",
        INTERNAL_TRANSFER => "internal_transfer",
        EXCESS => "excess",
        BURN => "burn",
        BURN_NOTIFICATION => "burn_notification",
        _ => return None,
    };
    Some(name)
}

/// `0x`-prefixed, zero-padded hex rendering used in attributes
pub fn to_hex(op: u32) -> String {
    format!("{op:#010x}")
}
