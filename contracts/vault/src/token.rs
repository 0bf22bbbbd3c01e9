//! Token Transfer Capability.
//!
//! The Vault's token account is its balance on the CW20 token contract.
//! Transfers leave as reply-on-error submessages: a failing transfer is
//! reported to the Vault's `reply` entry point and does not abort the
//! operation that issued it.

use claim_protocol::msg::query_id_payload;
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Coin, QuerierWrapper, StdResult, SubMsg, Uint128, WasmMsg,
};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

pub const TRANSFER_REPLY_ID: u64 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenAccount {
    pub token: Addr,
    pub owner: Addr,
}

impl TokenAccount {
    pub fn new(token: Addr, owner: Addr) -> Self {
        Self { token, owner }
    }

    pub fn balance(&self, querier: &QuerierWrapper) -> StdResult<Uint128> {
        let res: BalanceResponse = querier.query_wasm_smart(
            self.token.to_string(),
            &Cw20QueryMsg::Balance {
                address: self.owner.to_string(),
            },
        )?;
        Ok(res.balance)
    }

    /// Enqueue `amount` tokens for `to_owner`, optionally with native value
    /// alongside. Completion is not observable here.
    pub fn initiate_transfer(
        &self,
        to_owner: &Addr,
        amount: Uint128,
        forward_amount: Option<Coin>,
        query_id: u64,
    ) -> StdResult<Vec<SubMsg>> {
        let transfer = WasmMsg::Execute {
            contract_addr: self.token.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: to_owner.to_string(),
                amount,
            })?,
            funds: vec![],
        };
        let mut msgs = vec![SubMsg::reply_on_error(transfer, TRANSFER_REPLY_ID)
            .with_payload(query_id_payload(query_id))];

        if let Some(forward) = forward_amount.filter(|coin| !coin.amount.is_zero()) {
            let send = BankMsg::Send {
                to_address: to_owner.to_string(),
                amount: vec![forward],
            };
            msgs.push(
                SubMsg::reply_on_error(send, TRANSFER_REPLY_ID)
                    .with_payload(query_id_payload(query_id)),
            );
        }
        Ok(msgs)
    }
}
