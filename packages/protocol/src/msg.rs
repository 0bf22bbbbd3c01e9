use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, Coin, Uint128, WasmMsg};

use crate::error::ProtocolError;
use crate::message::{encode, ActorMessage};

/// Execute entry shared by every actor.
#[cw_serde]
pub enum ExecuteMsg {
    /// Opcode-tagged bit-packed body; empty body tops up the balance
    Message { body: Binary },
}

impl ExecuteMsg {
    pub fn encode<M: ActorMessage>(query_id: u64, msg: &M) -> Result<Self, ProtocolError> {
        Ok(ExecuteMsg::Message {
            body: encode(query_id, msg)?,
        })
    }
}

/// Proxy instantiation; the instantiating sender becomes the admin.
#[cw_serde]
pub struct ProxyInstantiateMsg {
    pub user_address: String,
    pub claim_amount: Uint128,
    pub native_denom: String,
}

/// Submessage payload carrying the correlation id into the reply.
pub fn query_id_payload(query_id: u64) -> Binary {
    Binary::from(query_id.to_be_bytes().to_vec())
}

/// Inverse of [`query_id_payload`]; anything else reads as 0.
pub fn query_id_from_payload(payload: &Binary) -> u64 {
    <[u8; 8]>::try_from(payload.as_slice())
        .map(u64::from_be_bytes)
        .unwrap_or_default()
}

/// Wasm execute carrying an encoded actor message.
pub fn send_message<M: ActorMessage>(
    contract: impl Into<String>,
    query_id: u64,
    msg: &M,
    funds: Vec<Coin>,
) -> Result<WasmMsg, ProtocolError> {
    Ok(WasmMsg::Execute {
        contract_addr: contract.into(),
        msg: to_json_binary(&ExecuteMsg::encode(query_id, msg)?)?,
        funds,
    })
}
