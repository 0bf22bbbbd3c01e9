use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, HexBinary, Uint128};

pub use claim_protocol::msg::ExecuteMsg;

#[cw_serde]
pub struct InstantiateMsg {
    /// Admin identity, defaults to the instantiating sender
    pub admin: Option<String>,
    /// CW20 token contract
    pub token: String,
    /// Code id of the Proxy contract
    pub user_code_id: u64,
    /// Checksum of the Proxy code
    pub user_code_checksum: HexBinary,
    /// Native denomination
    pub native_denom: String,
    /// Baseline tokens per claim for new Proxies
    pub base_claim_amount: Option<Uint128>,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Get configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Native custodial balance
    #[returns(Coin)]
    Balance {},

    /// Token account of the Vault
    #[returns(TokenAccountResponse)]
    TokenAccount {},

    /// Derived Proxy address for a user
    #[returns(ProxyAddressResponse)]
    ProxyAddress { user: String },
}

// Response types

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub token: Addr,
    pub user_code_id: u64,
    pub user_code_checksum: HexBinary,
    pub native_denom: String,
    pub base_claim_amount: Uint128,
    pub protocol_version: String,
}

#[cw_serde]
pub struct TokenAccountResponse {
    pub token: Addr,
    pub owner: Addr,
    pub balance: Uint128,
}

#[cw_serde]
pub struct ProxyAddressResponse {
    pub user: Addr,
    pub proxy: Addr,
}
