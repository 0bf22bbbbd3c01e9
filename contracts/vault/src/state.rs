use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, Uint128};
use cw_storage_plus::Item;

#[cw_serde]
pub struct Config {
    /// Identity allowed to run privileged operations
    pub admin: Addr,
    /// CW20 token custodied by the Vault
    pub token: Addr,
    /// Code id Proxies are deployed from
    pub user_code_id: u64,
    /// Checksum of `user_code_id`, input of Proxy address derivation
    pub user_code_checksum: HexBinary,
    /// Native denomination of deposits, fees and withdrawals
    pub native_denom: String,
    /// Baseline claim amount baked into every Proxy
    pub base_claim_amount: Uint128,
}

/// Configuration storage, immutable after instantiate
pub const CONFIG: Item<Config> = Item::new("config");
