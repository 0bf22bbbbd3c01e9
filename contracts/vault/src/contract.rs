use claim_protocol::msg::{
    query_id_from_payload, query_id_payload, send_message, ProxyInstantiateMsg,
};
use claim_protocol::{
    decode, derive_proxy_address, op, ProxyInitState, ProxyMsg, VaultMsg, DEFAULT_CLAIM_AMOUNT,
    PROTOCOL_VERSION,
};
use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Api, BankMsg, Binary, Coin, Deps, DepsMut, Env,
    MessageInfo, Reply, Response, StdError, StdResult, SubMsg, SubMsgResult, Uint128, WasmMsg,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, ProxyAddressResponse, QueryMsg,
    TokenAccountResponse,
};
use crate::state::{Config, CONFIG};
use crate::token::{TokenAccount, TRANSFER_REPLY_ID};

const CONTRACT_NAME: &str = "crates.io:claim-vault";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const FORWARD_REPLY_ID: u64 = 2;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.user_code_checksum.len() != 32 {
        return Err(ContractError::InvalidChecksum {});
    }

    let admin = match msg.admin {
        Some(admin) => deps.api.addr_validate(&admin)?,
        None => info.sender,
    };
    let config = Config {
        admin,
        token: deps.api.addr_validate(&msg.token)?,
        user_code_id: msg.user_code_id,
        user_code_checksum: msg.user_code_checksum,
        native_denom: msg.native_denom,
        base_claim_amount: msg
            .base_claim_amount
            .unwrap_or(Uint128::new(DEFAULT_CLAIM_AMOUNT)),
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("token", config.token)
        .add_attribute("user_code_id", config.user_code_id.to_string())
        .add_attribute("base_claim_amount", config.base_claim_amount))
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
            let Some(envelope) = decode::<VaultMsg>(body.as_slice())? else {
                return execute_deposit(deps, info, 0);
            };
            let query_id = envelope.query_id;
            match envelope.msg {
                VaultMsg::Deposit => execute_deposit(deps, info, query_id),
                VaultMsg::Claim {
                    claim_amount,
                    recipient,
                } => execute_claim(deps, env, info, query_id, claim_amount, recipient),
                VaultMsg::FirstClaim {
                    claim_amount,
                    recipient,
                } => execute_first_claim(deps, env, info, query_id, claim_amount, recipient),
                VaultMsg::Boost {
                    user_address,
                    boost,
                } => execute_boost(deps, env, info, query_id, user_address, boost),
                VaultMsg::DeployProxy { user_address } => {
                    execute_deploy_proxy(deps, env, info, query_id, user_address)
                }
                VaultMsg::WithdrawNative { amount } => {
                    execute_withdraw_native(deps, env, info, query_id, amount)
                }
                VaultMsg::WithdrawToken { amount } => {
                    execute_withdraw_token(deps, env, info, query_id, amount)
                }
                VaultMsg::WithdrawEmergency { token_amount } => {
                    execute_withdraw_emergency(deps, env, info, query_id, token_amount)
                }
                VaultMsg::WithdrawProxyEmergency { user_address } => {
                    execute_withdraw_proxy_emergency(deps, env, info, query_id, user_address)
                }
                VaultMsg::TransferNotification { amount, from } => Ok(Response::new()
                    .add_attribute("method", "transfer_notification")
                    .add_attribute("query_id", query_id.to_string())
                    .add_attribute("from", from)
                    .add_attribute("amount", amount)),
                VaultMsg::Excess => Ok(Response::new()
                    .add_attribute("method", "excess")
                    .add_attribute("query_id", query_id.to_string())),
            }
        }
    }
}

fn ensure_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::AccessDenied {});
    }
    Ok(())
}

fn proxy_init_state(config: &Config, vault: &Addr, user: Addr) -> ProxyInitState {
    ProxyInitState {
        admin: vault.clone(),
        user,
        claim_amount: config.base_claim_amount,
        native_denom: config.native_denom.clone(),
    }
}

fn proxy_address(
    api: &dyn Api,
    config: &Config,
    vault: &Addr,
    user: Addr,
) -> Result<Addr, ContractError> {
    let init = proxy_init_state(config, vault, user);
    Ok(derive_proxy_address(
        api,
        config.user_code_checksum.as_slice(),
        &init,
    )?)
}

fn paid(info: &MessageInfo, denom: &str) -> Uint128 {
    info.funds
        .iter()
        .filter(|coin| coin.denom == denom)
        .map(|coin| coin.amount)
        .sum()
}

fn token_account(config: &Config, env: &Env) -> TokenAccount {
    TokenAccount::new(config.token.clone(), env.contract.address.clone())
}

/// Funds arrive with the message; nothing else to do.
pub fn execute_deposit(
    deps: DepsMut,
    info: MessageInfo,
    query_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let amount = paid(&info, &config.native_denom);

    Ok(Response::new()
        .add_attribute("method", "deposit")
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("sender", info.sender)
        .add_attribute("amount", amount))
}

/// Accepts a claim only from the exact Proxy this Vault derives for `recipient`.
pub fn execute_claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    claim_amount: Uint128,
    recipient: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let recipient = deps.api.addr_validate(&recipient)?;
    let proxy = proxy_address(deps.api, &config, &env.contract.address, recipient.clone())?;
    if info.sender != proxy {
        return Err(ContractError::AccessDenied {});
    }

    let transfer =
        token_account(&config, &env).initiate_transfer(&recipient, claim_amount, None, query_id)?;

    Ok(Response::new()
        .add_submessages(transfer)
        .add_attribute("method", "claim")
        .add_attribute("op", op::to_hex(op::CLAIM))
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("proxy", proxy)
        .add_attribute("recipient", recipient)
        .add_attribute("claim_amount", claim_amount))
}

/// Admin disbursement without a Proxy. Attached native value travels to the
/// recipient alongside the tokens.
pub fn execute_first_claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    claim_amount: Uint128,
    recipient: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let recipient = deps.api.addr_validate(&recipient)?;
    let forward = Coin::new(paid(&info, &config.native_denom), config.native_denom.clone());
    let forward_amount = forward.amount;
    let transfer = token_account(&config, &env).initiate_transfer(
        &recipient,
        claim_amount,
        Some(forward),
        query_id,
    )?;

    Ok(Response::new()
        .add_submessages(transfer)
        .add_attribute("method", "first_claim")
        .add_attribute("op", op::to_hex(op::FIRST_CLAIM))
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("recipient", recipient)
        .add_attribute("claim_amount", claim_amount)
        .add_attribute("forward_amount", forward_amount))
}

/// Forwards the boost, with the attached funds, to the user's Proxy.
pub fn execute_boost(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    user_address: String,
    boost: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let user = deps.api.addr_validate(&user_address)?;
    let proxy = proxy_address(deps.api, &config, &env.contract.address, user.clone())?;
    let msg = send_message(
        proxy.to_string(),
        query_id,
        &ProxyMsg::Boost { amount: boost },
        info.funds,
    )?;

    Ok(Response::new()
        .add_submessage(
            SubMsg::reply_on_error(msg, FORWARD_REPLY_ID)
                .with_payload(query_id_payload(query_id)),
        )
        .add_attribute("method", "boost")
        .add_attribute("op", op::to_hex(op::BOOST))
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("user", user)
        .add_attribute("proxy", proxy)
        .add_attribute("boost", boost))
}

/// Instantiates the user's Proxy at its derived address.
pub fn execute_deploy_proxy(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    user_address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let user = deps.api.addr_validate(&user_address)?;
    let init = proxy_init_state(&config, &env.contract.address, user.clone());
    let proxy = derive_proxy_address(deps.api, config.user_code_checksum.as_slice(), &init)?;
    let salt = init.salt()?;

    let instantiate = WasmMsg::Instantiate2 {
        admin: None,
        code_id: config.user_code_id,
        label: format!("claim-proxy {user}"),
        msg: to_json_binary(&ProxyInstantiateMsg {
            user_address: user.to_string(),
            claim_amount: init.claim_amount,
            native_denom: init.native_denom.clone(),
        })?,
        funds: info.funds,
        salt: salt.clone(),
    };

    Ok(Response::new()
        .add_message(instantiate)
        .add_attribute("method", "deploy_proxy")
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("user", user)
        .add_attribute("proxy", proxy)
        .add_attribute("salt", hex::encode(salt.as_slice())))
}

pub fn execute_withdraw_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.native_denom)?;
    if amount > balance.amount {
        return Err(ContractError::InsufficientBalance {
            available: balance.amount,
            requested: amount,
        });
    }

    let mut response = Response::new()
        .add_attribute("method", "withdraw_native")
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("amount", amount);
    if !amount.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: config.admin.to_string(),
            amount: vec![Coin::new(amount, config.native_denom)],
        });
    }
    Ok(response)
}

pub fn execute_withdraw_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let transfer =
        token_account(&config, &env).initiate_transfer(&config.admin, amount, None, query_id)?;

    Ok(Response::new()
        .add_submessages(transfer)
        .add_attribute("method", "withdraw_token")
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("amount", amount))
}

/// Sends every custodied token (`token_amount == 0` means all) and the whole
/// native balance to the admin.
pub fn execute_withdraw_emergency(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    token_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let account = token_account(&config, &env);
    let token_amount = if token_amount.is_zero() {
        account.balance(&deps.querier)?
    } else {
        token_amount
    };
    let native = deps
        .querier
        .query_balance(&env.contract.address, &config.native_denom)?;

    let mut response = Response::new()
        .add_attribute("method", "withdraw_emergency")
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("token_amount", token_amount)
        .add_attribute("native_amount", native.amount);
    if !token_amount.is_zero() {
        let transfer = account.initiate_transfer(&config.admin, token_amount, None, query_id)?;
        response = response.add_submessages(transfer);
    }
    if !native.amount.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: config.admin.to_string(),
            amount: vec![native],
        });
    }
    Ok(response)
}

/// Asks the user's Proxy to return its whole native balance to the Vault.
pub fn execute_withdraw_proxy_emergency(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    query_id: u64,
    user_address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    let user = deps.api.addr_validate(&user_address)?;
    let proxy = proxy_address(deps.api, &config, &env.contract.address, user.clone())?;
    let msg = send_message(
        proxy.to_string(),
        query_id,
        &ProxyMsg::WithdrawEmergency,
        vec![],
    )?;

    Ok(Response::new()
        .add_submessage(
            SubMsg::reply_on_error(msg, FORWARD_REPLY_ID).with_payload(query_id_payload(query_id)),
        )
        .add_attribute("method", "withdraw_proxy_emergency")
        .add_attribute("op", op::to_hex(op::WITHDRAW_PROXY_EMERGENCY))
        .add_attribute("query_id", query_id.to_string())
        .add_attribute("user", user)
        .add_attribute("proxy", proxy))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    let method = match (msg.id, &msg.result) {
        (TRANSFER_REPLY_ID, SubMsgResult::Err(_)) => "transfer_bounced",
        (FORWARD_REPLY_ID, SubMsgResult::Err(_)) => "forward_bounced",
        (id, _) => return Err(ContractError::UnknownReply { id }),
    };
    let reason = match msg.result {
        SubMsgResult::Err(reason) => reason,
        SubMsgResult::Ok(_) => String::new(),
    };

    Ok(Response::new()
        .add_attribute("method", method)
        .add_attribute("query_id", query_id_from_payload(&msg.payload).to_string())
        .add_attribute("reason", reason))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Balance {} => to_json_binary(&query_balance(deps, env)?),
        QueryMsg::TokenAccount {} => to_json_binary(&query_token_account(deps, env)?),
        QueryMsg::ProxyAddress { user } => to_json_binary(&query_proxy_address(deps, env, user)?),
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        token: config.token,
        user_code_id: config.user_code_id,
        user_code_checksum: config.user_code_checksum,
        native_denom: config.native_denom,
        base_claim_amount: config.base_claim_amount,
        protocol_version: PROTOCOL_VERSION.to_string(),
    })
}

fn query_balance(deps: Deps, env: Env) -> StdResult<Coin> {
    let config = CONFIG.load(deps.storage)?;
    deps.querier
        .query_balance(env.contract.address, config.native_denom)
}

fn query_token_account(deps: Deps, env: Env) -> StdResult<TokenAccountResponse> {
    let config = CONFIG.load(deps.storage)?;
    let account = token_account(&config, &env);
    let balance = account.balance(&deps.querier)?;
    Ok(TokenAccountResponse {
        token: account.token,
        owner: account.owner,
        balance,
    })
}

fn query_proxy_address(deps: Deps, env: Env, user: String) -> StdResult<ProxyAddressResponse> {
    let config = CONFIG.load(deps.storage)?;
    let user = deps.api.addr_validate(&user)?;
    let init = proxy_init_state(&config, &env.contract.address, user.clone());
    let proxy = derive_proxy_address(deps.api, config.user_code_checksum.as_slice(), &init)
        .map_err(|err| StdError::generic_err(err.to_string()))?;
    Ok(ProxyAddressResponse { user, proxy })
}
