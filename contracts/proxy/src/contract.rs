use claim_protocol::msg::{query_id_from_payload, query_id_payload, send_message};
use claim_protocol::{claim_available, decode, next_claim_at, op, ProxyMsg, VaultMsg};
use cosmwasm_std::{
    coins, entry_point, to_json_binary, BankMsg, Binary, Coin, Deps, DepsMut, Env, MessageInfo,
    Reply, Response, StdResult, SubMsg, SubMsgResult, Uint128,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::{
    ClaimAmountResponse, ClaimFeeResponse, ExecuteMsg, InstantiateMsg,
    LastTransactionTimeResponse, QueryMsg, StorageResponse,
};
use crate::state::{ProxyState, NATIVE_DENOM, STATE};

const CONTRACT_NAME: &str = "crates.io:claim-proxy";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Native value a claim must carry
pub const CLAIM_FEE: Uint128 = Uint128::new(250_000);
/// Part of the claim fee kept by the Proxy; the rest funds the Vault hop
pub const PROCESSING_FEE: Uint128 = Uint128::new(10_000);

const FORWARD_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let state = ProxyState {
        admin: info.sender,
        user: deps.api.addr_validate(&msg.user_address)?,
        claim_amount: msg.claim_amount,
        last_transaction_time: 0,
    };
    STATE.save(deps.storage, &state)?;
    NATIVE_DENOM.save(deps.storage, &msg.native_denom)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", state.admin)
        .add_attribute("user", state.user)
        .add_attribute("claim_amount", state.claim_amount))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Message { body } => {
            let Some(envelope) = decode::<ProxyMsg>(body.as_slice())? else {
                return Ok(Response::new()
                    .add_attribute("method", "top_up")
                    .add_attribute("sender", info.sender));
            };
            match envelope.msg {
                ProxyMsg::Claim => execute_claim(deps, env, info, envelope.query_id),
                ProxyMsg::Boost { amount } => {
                    execute_boost(deps, info, envelope.query_id, amount)
                }
                ProxyMsg::WithdrawEmergency => {
                    execute_withdraw_emergency(deps, env, info, envelope.query_id)
                }
            }
        }
    }
}

fn paid(info: &MessageInfo, denom: &str) -> Uint128 {
    info.funds
        .iter()
        .filter(|coin| coin.denom == denom)
        .map(|coin| coin.amount)
        .sum()
}

pub fn execute_claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
) -> Result<Response, ContractError> {
    let mut state = STATE.load(deps.storage)?;
    if info.sender != state.user {
        return Err(ContractError::AccessDenied {});
    }

    let denom = NATIVE_DENOM.load(deps.storage)?;
    let value = paid(&info, &denom);
    if value < CLAIM_FEE {
        return Err(ContractError::NotEnoughTon {
            required: CLAIM_FEE,
            received: value,
        });
    }

    let now = env.block.time.seconds();
    if !claim_available(now, state.last_transaction_time) {
        return Err(ContractError::NotYet {
            available_at: next_claim_at(state.last_transaction_time),
        });
    }

    state.last_transaction_time = now;
    STATE.save(deps.storage, &state)?;

    // A Vault-side bounce does not undo the throttle update above
    let forward = value.checked_sub(PROCESSING_FEE)?;
    let claim = VaultMsg::Claim {
        claim_amount: state.claim_amount,
        recipient: state.user.to_string(),
    };
    let msg = send_message(
        state.admin.to_string(),
        query_id,
        &claim,
        coins(forward.u128(), denom),
    )?;

    Ok(Response::new()
        .add_submessage(
            SubMsg::reply_on_error(msg, FORWARD_REPLY_ID).with_payload(query_id_payload(query_id)),
        )
        .add_attribute("method", "claim")
        .add_attribute("op", op::to_hex(op::CLAIM))
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("user", state.user)
        .add_attribute("claim_amount", state.claim_amount)
        .add_attribute("last_transaction_time", now.to_string()))
}

pub fn execute_boost(
    deps: DepsMut,
    info: MessageInfo,
    query_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let mut state = STATE.load(deps.storage)?;
    if info.sender != state.admin {
        return Err(ContractError::AccessDenied {});
    }

    state.claim_amount = state.claim_amount.checked_add(amount)?;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("method", "boost")
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("boost", amount)
        .add_attribute("claim_amount", state.claim_amount))
}

/// Sends the whole native balance to the admin. Claim state is left as is.
pub fn execute_withdraw_emergency(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
) -> Result<Response, ContractError> {
    let state = STATE.load(deps.storage)?;
    if info.sender != state.admin {
        return Err(ContractError::AccessDenied {});
    }

    let denom = NATIVE_DENOM.load(deps.storage)?;
    let balance = deps.querier.query_balance(&env.contract.address, denom)?;

    let mut response = Response::new()
        .add_attribute("method", "withdraw_emergency")
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("amount", balance.amount);
    if !balance.amount.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: state.admin.to_string(),
            amount: vec![balance],
        });
    }
    Ok(response)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match (msg.id, msg.result) {
        (FORWARD_REPLY_ID, SubMsgResult::Err(reason)) => Ok(Response::new()
            .add_attribute("method", "forward_bounced")
            .add_attribute("query_id", query_id_from_payload(&msg.payload).to_string())
            .add_attribute("reason", reason)),
        (id, _) => Err(ContractError::UnknownReply { id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Storage {} => to_json_binary(&query_storage(deps)?),
        QueryMsg::ClaimAmount {} => to_json_binary(&query_claim_amount(deps)?),
        QueryMsg::ClaimFee {} => to_json_binary(&query_claim_fee(deps)?),
        QueryMsg::LastTransactionTime {} => to_json_binary(&query_last_transaction_time(deps)?),
        QueryMsg::Balance {} => to_json_binary(&query_balance(deps, env)?),
    }
}

fn query_storage(deps: Deps) -> StdResult<StorageResponse> {
    let state = STATE.load(deps.storage)?;
    Ok(StorageResponse {
        admin: state.admin,
        user: state.user,
        claim_amount: state.claim_amount,
        last_transaction_time: state.last_transaction_time,
    })
}

fn query_claim_amount(deps: Deps) -> StdResult<ClaimAmountResponse> {
    let state = STATE.load(deps.storage)?;
    Ok(ClaimAmountResponse {
        claim_amount: state.claim_amount,
    })
}

fn query_claim_fee(deps: Deps) -> StdResult<ClaimFeeResponse> {
    let denom = NATIVE_DENOM.load(deps.storage)?;
    Ok(ClaimFeeResponse {
        fee: Coin::new(CLAIM_FEE, denom),
    })
}

fn query_last_transaction_time(deps: Deps) -> StdResult<LastTransactionTimeResponse> {
    let state = STATE.load(deps.storage)?;
    Ok(LastTransactionTimeResponse {
        last_transaction_time: state.last_transaction_time,
        next_claim_at: next_claim_at(state.last_transaction_time),
    })
}

fn query_balance(deps: Deps, env: Env) -> StdResult<Coin> {
    let denom = NATIVE_DENOM.load(deps.storage)?;
    deps.querier.query_balance(env.contract.address, denom)
}
