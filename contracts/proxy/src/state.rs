use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::Item;

#[cw_serde]
pub struct ProxyState {
    /// Vault allowed to push privileged updates
    pub admin: Addr,
    /// End user allowed to claim
    pub user: Addr,
    /// Tokens granted per successful claim (baseline + boosts)
    pub claim_amount: Uint128,
    /// Block time of the last successful claim, 0 = never
    pub last_transaction_time: u64,
}

/// Proxy storage
pub const STATE: Item<ProxyState> = Item::new("state");

/// Denomination the claim fee is paid in
pub const NATIVE_DENOM: Item<String> = Item::new("native_denom");
