use anyhow::Result as AnyResult;
use claim_protocol::msg::ExecuteMsg;
use claim_protocol::{ProxyMsg, VaultMsg, CLAIM_INTERVAL};
use claim_proxy::contract::CLAIM_FEE;
use claim_proxy::msg::{QueryMsg as ProxyQueryMsg, StorageResponse};
use cosmwasm_std::{coins, Addr, Coin, Empty, HexBinary, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use crate::msg::{InstantiateMsg, ProxyAddressResponse, QueryMsg};
use crate::ContractError;

const DENOM: &str = "uatom";
const BASE_AMOUNT: u128 = 1_000_000;
const VAULT_TOKENS: u128 = 5_000_000;

fn vault_contract() -> Box<dyn Contract<Empty>> {
    Box::new(
        ContractWrapper::new(
            crate::contract::execute,
            crate::contract::instantiate,
            crate::contract::query,
        )
        .with_reply(crate::contract::reply),
    )
}

fn proxy_contract() -> Box<dyn Contract<Empty>> {
    Box::new(
        ContractWrapper::new(
            claim_proxy::contract::execute,
            claim_proxy::contract::instantiate,
            claim_proxy::contract::query,
        )
        .with_reply(claim_proxy::contract::reply),
    )
}

fn token_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

struct Suite {
    app: App,
    admin: Addr,
    user: Addr,
    vault: Addr,
    token: Addr,
    proxy_code_id: u64,
}

impl Suite {
    fn new(vault_tokens: u128) -> Self {
        let mut app = App::default();
        let admin = app.api().addr_make("admin");
        let user = app.api().addr_make("user");

        app.init_modules(|router, _, storage| {
            router
                .bank
                .init_balance(storage, &admin, coins(10_000_000, DENOM))
                .unwrap();
            router
                .bank
                .init_balance(storage, &user, coins(10_000_000, DENOM))
                .unwrap();
        });

        let vault_code_id = app.store_code(vault_contract());
        let proxy_code_id = app.store_code(proxy_contract());
        let token_code_id = app.store_code(token_contract());

        let token = app
            .instantiate_contract(
                token_code_id,
                admin.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: "Claim Token".to_string(),
                    symbol: "CLAIM".to_string(),
                    decimals: 6,
                    initial_balances: vec![Cw20Coin {
                        address: admin.to_string(),
                        amount: Uint128::new(1),
                    }],
                    mint: Some(MinterResponse {
                        minter: admin.to_string(),
                        cap: None,
                    }),
                    marketing: None,
                },
                &[],
                "token",
                None,
            )
            .unwrap();

        let checksum = app
            .wrap()
            .query_wasm_code_info(proxy_code_id)
            .unwrap()
            .checksum;
        let vault = app
            .instantiate_contract(
                vault_code_id,
                admin.clone(),
                &InstantiateMsg {
                    admin: None,
                    token: token.to_string(),
                    user_code_id: proxy_code_id,
                    user_code_checksum: HexBinary::from(checksum.as_slice()),
                    native_denom: DENOM.to_string(),
                    base_claim_amount: None,
                },
                &[],
                "vault",
                None,
            )
            .unwrap();

        if vault_tokens > 0 {
            app.execute_contract(
                admin.clone(),
                token.clone(),
                &Cw20ExecuteMsg::Mint {
                    recipient: vault.to_string(),
                    amount: Uint128::new(vault_tokens),
                },
                &[],
            )
            .unwrap();
        }

        Suite {
            app,
            admin,
            user,
            vault,
            token,
            proxy_code_id,
        }
    }

    fn send_vault(
        &mut self,
        sender: &Addr,
        msg: VaultMsg,
        funds: &[Coin],
    ) -> AnyResult<AppResponse> {
        let msg = ExecuteMsg::encode(1, &msg)?;
        self.app
            .execute_contract(sender.clone(), self.vault.clone(), &msg, funds)
    }

    fn send_proxy(
        &mut self,
        sender: &Addr,
        proxy: &Addr,
        msg: ProxyMsg,
        funds: &[Coin],
    ) -> AnyResult<AppResponse> {
        let msg = ExecuteMsg::encode(2, &msg)?;
        self.app
            .execute_contract(sender.clone(), proxy.clone(), &msg, funds)
    }

    fn claim(&mut self, proxy: &Addr) -> AnyResult<AppResponse> {
        let user = self.user.clone();
        self.send_proxy(&user, proxy, ProxyMsg::Claim, &coins(CLAIM_FEE.u128(), DENOM))
    }

    fn proxy_address(&self, user: &Addr) -> Addr {
        let res: ProxyAddressResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.vault,
                &QueryMsg::ProxyAddress {
                    user: user.to_string(),
                },
            )
            .unwrap();
        res.proxy
    }

    fn deploy_proxy(&mut self) -> Addr {
        let admin = self.admin.clone();
        let user = self.user.clone();
        self.send_vault(
            &admin,
            VaultMsg::DeployProxy {
                user_address: user.to_string(),
            },
            &[],
        )
        .unwrap();
        self.proxy_address(&user)
    }

    fn token_balance(&self, owner: &Addr) -> u128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.token,
                &Cw20QueryMsg::Balance {
                    address: owner.to_string(),
                },
            )
            .unwrap();
        res.balance.u128()
    }

    fn native_balance(&self, owner: &Addr) -> u128 {
        self.app
            .wrap()
            .query_balance(owner, DENOM)
            .unwrap()
            .amount
            .u128()
    }

    fn proxy_state(&self, proxy: &Addr) -> StorageResponse {
        self.app
            .wrap()
            .query_wasm_smart(proxy, &ProxyQueryMsg::Storage {})
            .unwrap()
    }

    fn next_day(&mut self) {
        self.app
            .update_block(|block| block.time = block.time.plus_seconds(CLAIM_INTERVAL));
    }
}

fn has_method(res: &AppResponse, method: &str) -> bool {
    res.events.iter().any(|event| {
        event
            .attributes
            .iter()
            .any(|attr| attr.key == "method" && attr.value == method)
    })
}

#[test]
fn deployed_proxy_lands_on_derived_address() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let expected = suite.proxy_address(&suite.user.clone());
    let proxy = suite.deploy_proxy();
    assert_eq!(proxy, expected);

    let info = suite.app.wrap().query_wasm_contract_info(&proxy).unwrap();
    assert_eq!(info.code_id, suite.proxy_code_id);

    let state = suite.proxy_state(&proxy);
    assert_eq!(state.admin, suite.vault);
    assert_eq!(state.user, suite.user);
    assert_eq!(state.claim_amount, Uint128::new(BASE_AMOUNT));
    assert_eq!(state.last_transaction_time, 0);
}

#[test]
fn daily_claim_with_boost() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let proxy = suite.deploy_proxy();
    let user = suite.user.clone();

    let res = suite.claim(&proxy).unwrap();
    assert!(has_method(&res, "claim"));
    assert_eq!(suite.token_balance(&user), BASE_AMOUNT);
    assert_eq!(suite.token_balance(&suite.vault), VAULT_TOKENS - BASE_AMOUNT);

    let err = suite.claim(&proxy).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<claim_proxy::ContractError>(),
        Some(claim_proxy::ContractError::NotYet { .. })
    ));
    assert_eq!(suite.token_balance(&user), BASE_AMOUNT);

    let admin = suite.admin.clone();
    suite
        .send_vault(
            &admin,
            VaultMsg::Boost {
                user_address: user.to_string(),
                boost: Uint128::new(500_000),
            },
            &[],
        )
        .unwrap();
    assert_eq!(
        suite.proxy_state(&proxy).claim_amount,
        Uint128::new(BASE_AMOUNT + 500_000)
    );

    suite.next_day();
    suite.claim(&proxy).unwrap();
    assert_eq!(suite.token_balance(&user), 2 * BASE_AMOUNT + 500_000);
}

#[test]
fn claim_fee_flows_to_vault() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let proxy = suite.deploy_proxy();
    let user_before = suite.native_balance(&suite.user.clone());

    suite.claim(&proxy).unwrap();
    assert_eq!(
        suite.native_balance(&suite.user.clone()),
        user_before - CLAIM_FEE.u128()
    );
    assert_eq!(
        suite.native_balance(&suite.vault.clone()),
        (CLAIM_FEE - claim_proxy::contract::PROCESSING_FEE).u128()
    );
    assert_eq!(
        suite.native_balance(&proxy),
        claim_proxy::contract::PROCESSING_FEE.u128()
    );
}

#[test]
fn bounced_transfer_keeps_throttle() {
    let mut suite = Suite::new(0);
    let proxy = suite.deploy_proxy();
    let user = suite.user.clone();

    let res = suite.claim(&proxy).unwrap();
    assert!(has_method(&res, "transfer_bounced"));
    assert_eq!(suite.token_balance(&user), 0);

    let now = suite.app.block_info().time.seconds();
    assert_eq!(suite.proxy_state(&proxy).last_transaction_time, now);

    let err = suite.claim(&proxy).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<claim_proxy::ContractError>(),
        Some(claim_proxy::ContractError::NotYet { .. })
    ));
}

#[test]
fn foreign_proxy_is_refused() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let user = suite.user.clone();
    let vault = suite.vault.clone();

    // Same code, user and admin, but not at the derived address
    let fake = suite
        .app
        .instantiate_contract(
            suite.proxy_code_id,
            vault.clone(),
            &claim_proxy::msg::InstantiateMsg {
                user_address: user.to_string(),
                claim_amount: Uint128::new(VAULT_TOKENS),
                native_denom: DENOM.to_string(),
            },
            &[],
            "fake-proxy",
            None,
        )
        .unwrap();

    let res = suite.claim(&fake).unwrap();
    assert!(has_method(&res, "forward_bounced"));
    assert_eq!(suite.proxy_state(&fake).admin, vault);
    assert_eq!(suite.token_balance(&user), 0);
    assert_eq!(suite.token_balance(&vault), VAULT_TOKENS);

    // direct claim from the user is refused too
    let err = suite
        .send_vault(
            &user,
            VaultMsg::Claim {
                claim_amount: Uint128::new(1),
                recipient: user.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ContractError>(),
        Some(ContractError::AccessDenied {})
    ));
}

#[test]
fn boost_to_undeployed_proxy_bounces() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let admin = suite.admin.clone();
    let stranger = suite.app.api().addr_make("stranger");

    let res = suite
        .send_vault(
            &admin,
            VaultMsg::Boost {
                user_address: stranger.to_string(),
                boost: Uint128::new(1),
            },
            &[],
        )
        .unwrap();
    assert!(has_method(&res, "forward_bounced"));
}

#[test]
fn emergency_withdraw_empties_vault() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let admin = suite.admin.clone();
    let user = suite.user.clone();
    let vault = suite.vault.clone();

    suite
        .send_vault(&user, VaultMsg::Deposit, &coins(1_000, DENOM))
        .unwrap();
    assert_eq!(suite.native_balance(&vault), 1_000);

    let err = suite
        .send_vault(
            &user,
            VaultMsg::WithdrawEmergency {
                token_amount: Uint128::zero(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ContractError>(),
        Some(ContractError::AccessDenied {})
    ));

    let admin_native = suite.native_balance(&admin);
    let admin_tokens = suite.token_balance(&admin);
    suite
        .send_vault(
            &admin,
            VaultMsg::WithdrawEmergency {
                token_amount: Uint128::zero(),
            },
            &[],
        )
        .unwrap();

    assert_eq!(suite.native_balance(&vault), 0);
    assert_eq!(suite.token_balance(&vault), 0);
    assert_eq!(suite.native_balance(&admin), admin_native + 1_000);
    assert_eq!(suite.token_balance(&admin), admin_tokens + VAULT_TOKENS);

    // a stranger sweeping the already empty vault is still refused
    let err = suite
        .send_vault(
            &user,
            VaultMsg::WithdrawEmergency {
                token_amount: Uint128::zero(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ContractError>(),
        Some(ContractError::AccessDenied {})
    ));
    assert_eq!(suite.native_balance(&vault), 0);
    assert_eq!(suite.token_balance(&vault), 0);
}

#[test]
fn processing_fees_recovered_from_proxy() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let proxy = suite.deploy_proxy();
    let admin = suite.admin.clone();
    let user = suite.user.clone();
    let vault = suite.vault.clone();
    let fee = claim_proxy::contract::PROCESSING_FEE.u128();

    suite.claim(&proxy).unwrap();
    suite.next_day();
    suite.claim(&proxy).unwrap();
    assert_eq!(suite.native_balance(&proxy), 2 * fee);
    let vault_before = suite.native_balance(&vault);

    // only the vault may sweep its proxy
    let err = suite
        .send_proxy(&admin, &proxy, ProxyMsg::WithdrawEmergency, &[])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<claim_proxy::ContractError>(),
        Some(claim_proxy::ContractError::AccessDenied {})
    ));

    let err = suite
        .send_vault(
            &user,
            VaultMsg::WithdrawProxyEmergency {
                user_address: user.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ContractError>(),
        Some(ContractError::AccessDenied {})
    ));

    let res = suite
        .send_vault(
            &admin,
            VaultMsg::WithdrawProxyEmergency {
                user_address: user.to_string(),
            },
            &[],
        )
        .unwrap();
    assert!(has_method(&res, "withdraw_proxy_emergency"));
    assert_eq!(suite.native_balance(&proxy), 0);
    assert_eq!(suite.native_balance(&vault), vault_before + 2 * fee);

    // throttle state is kept
    let now = suite.app.block_info().time.seconds();
    assert_eq!(suite.proxy_state(&proxy).last_transaction_time, now);
}

#[test]
fn admin_withdrawals() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let admin = suite.admin.clone();
    let vault = suite.vault.clone();

    suite
        .send_vault(&admin, VaultMsg::Deposit, &coins(2_000, DENOM))
        .unwrap();

    let err = suite
        .send_vault(
            &admin,
            VaultMsg::WithdrawNative {
                amount: Uint128::new(2_001),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ContractError>(),
        Some(ContractError::InsufficientBalance { .. })
    ));

    suite
        .send_vault(
            &admin,
            VaultMsg::WithdrawNative {
                amount: Uint128::new(500),
            },
            &[],
        )
        .unwrap();
    assert_eq!(suite.native_balance(&vault), 1_500);

    suite
        .send_vault(
            &admin,
            VaultMsg::WithdrawNative {
                amount: Uint128::zero(),
            },
            &[],
        )
        .unwrap();
    assert_eq!(suite.native_balance(&vault), 1_500);

    let admin_tokens = suite.token_balance(&admin);
    suite
        .send_vault(
            &admin,
            VaultMsg::WithdrawToken {
                amount: Uint128::new(300),
            },
            &[],
        )
        .unwrap();
    assert_eq!(suite.token_balance(&admin), admin_tokens + 300);
    assert_eq!(suite.token_balance(&vault), VAULT_TOKENS - 300);
}

#[test]
fn first_claim_pays_without_proxy() {
    let mut suite = Suite::new(VAULT_TOKENS);
    let admin = suite.admin.clone();
    let user = suite.user.clone();

    let res = suite
        .send_vault(
            &admin,
            VaultMsg::FirstClaim {
                claim_amount: Uint128::new(BASE_AMOUNT),
                recipient: user.to_string(),
            },
            &[],
        )
        .unwrap();
    assert!(has_method(&res, "first_claim"));
    assert_eq!(suite.token_balance(&user), BASE_AMOUNT);

    let user_native = suite.native_balance(&user);
    suite
        .send_vault(
            &admin,
            VaultMsg::FirstClaim {
                claim_amount: Uint128::new(1),
                recipient: user.to_string(),
            },
            &coins(50_000, DENOM),
        )
        .unwrap();
    assert_eq!(suite.native_balance(&user), user_native + 50_000);
    assert_eq!(suite.native_balance(&suite.vault.clone()), 0);
}
