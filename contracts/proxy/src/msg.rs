use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Coin, Uint128};

pub use claim_protocol::msg::{ExecuteMsg, ProxyInstantiateMsg as InstantiateMsg};

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Full persistent state
    #[returns(StorageResponse)]
    Storage {},

    /// Tokens granted per claim
    #[returns(ClaimAmountResponse)]
    ClaimAmount {},

    /// Native value a claim must carry
    #[returns(ClaimFeeResponse)]
    ClaimFee {},

    /// Time of the last successful claim
    #[returns(LastTransactionTimeResponse)]
    LastTransactionTime {},

    /// Native balance held by the Proxy
    #[returns(Coin)]
    Balance {},
}

// Response types

#[cw_serde]
pub struct StorageResponse {
    pub admin: Addr,
    pub user: Addr,
    pub claim_amount: Uint128,
    pub last_transaction_time: u64,
}

#[cw_serde]
pub struct ClaimAmountResponse {
    pub claim_amount: Uint128,
}

#[cw_serde]
pub struct ClaimFeeResponse {
    pub fee: Coin,
}

#[cw_serde]
pub struct LastTransactionTimeResponse {
    pub last_transaction_time: u64,
    /// Earliest time the next claim is accepted, 0 = now
    pub next_claim_at: u64,
}
