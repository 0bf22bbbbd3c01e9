//! Opcode-tagged message envelope: `op:uint32 | query_id:uint64 | payload`.

use cosmwasm_std::{Binary, Uint128};

use crate::cell::{Builder, Slice};
use crate::error::ProtocolError;
use crate::op;

/// Decoded message together with its correlation id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope<M> {
    pub op: u32,
    pub query_id: u64,
    pub msg: M,
}

/// Message set understood by one actor.
pub trait ActorMessage: Sized {
    fn op(&self) -> u32;

    fn store_payload(&self, builder: &mut Builder) -> Result<(), ProtocolError>;

    /// Must reject opcodes the actor does not handle with `UnknownOp`.
    fn load_payload(op: u32, slice: &mut Slice) -> Result<Self, ProtocolError>;
}

pub fn encode<M: ActorMessage>(query_id: u64, msg: &M) -> Result<Binary, ProtocolError> {
    let mut builder = Builder::new();
    builder.store_u32(msg.op()).store_u64(query_id);
    msg.store_payload(&mut builder)?;
    Ok(builder.into_binary())
}

/// Returns `None` for an empty body, which is a plain top-up.
pub fn decode<M: ActorMessage>(body: &[u8]) -> Result<Option<Envelope<M>>, ProtocolError> {
    if body.is_empty() {
        return Ok(None);
    }
    let mut slice = Slice::new(body);
    let op = slice.load_u32()?;
    let query_id = slice.load_u64()?;
    let msg = M::load_payload(op, &mut slice)?;
    slice.end_parse()?;
    Ok(Some(Envelope { op, query_id, msg }))
}

/// Messages handled by the Vault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultMsg {
    Deposit,
    /// Forwarded by the recipient's Proxy
    Claim {
        claim_amount: Uint128,
        recipient: String,
    },
    /// Admin disbursement that bypasses the Proxy layer
    FirstClaim {
        claim_amount: Uint128,
        recipient: String,
    },
    Boost {
        user_address: String,
        boost: Uint128,
    },
    DeployProxy {
        user_address: String,
    },
    WithdrawNative {
        amount: Uint128,
    },
    WithdrawToken {
        amount: Uint128,
    },
    /// `token_amount == 0` sweeps the whole token balance
    WithdrawEmergency {
        token_amount: Uint128,
    },
    /// Sweeps the native balance of the user's Proxy back to the Vault
    WithdrawProxyEmergency {
        user_address: String,
    },
    TransferNotification {
        amount: Uint128,
        from: String,
    },
    Excess,
}

impl ActorMessage for VaultMsg {
    fn op(&self) -> u32 {
        match self {
            VaultMsg::Deposit => op::DEPOSIT,
            VaultMsg::Claim { .. } => op::CLAIM,
            VaultMsg::FirstClaim { .. } => op::FIRST_CLAIM,
            VaultMsg::Boost { .. } => op::BOOST,
            VaultMsg::DeployProxy { .. } => op::DEPLOY_PROXY,
            VaultMsg::WithdrawNative { .. } => op::WITHDRAW_NATIVE,
            VaultMsg::WithdrawToken { .. } => op::WITHDRAW_TOKEN,
            VaultMsg::WithdrawEmergency { .. } => op::WITHDRAW_EMERGENCY,
            VaultMsg::WithdrawProxyEmergency { .. } => op::WITHDRAW_PROXY_EMERGENCY,
            VaultMsg::TransferNotification { .. } => op::TRANSFER_NOTIFICATION,
            VaultMsg::Excess => op::EXCESS,
        }
    }

    fn store_payload(&self, builder: &mut Builder) -> Result<(), ProtocolError> {
        match self {
            VaultMsg::Deposit | VaultMsg::Excess => {}
            VaultMsg::Claim {
                claim_amount,
                recipient,
            }
            | VaultMsg::FirstClaim {
                claim_amount,
                recipient,
            } => {
                builder.store_coins(*claim_amount)?.store_address(recipient)?;
            }
            VaultMsg::Boost {
                user_address,
                boost,
            } => {
                builder.store_address(user_address)?.store_coins(*boost)?;
            }
            VaultMsg::DeployProxy { user_address }
            | VaultMsg::WithdrawProxyEmergency { user_address } => {
                builder.store_address(user_address)?;
            }
            VaultMsg::WithdrawNative { amount } | VaultMsg::WithdrawToken { amount } => {
                builder.store_coins(*amount)?;
            }
            VaultMsg::WithdrawEmergency { token_amount } => {
                builder.store_coins(*token_amount)?;
            }
            VaultMsg::TransferNotification { amount, from } => {
                builder.store_coins(*amount)?.store_address(from)?;
            }
        }
        Ok(())
    }

    fn load_payload(op: u32, slice: &mut Slice) -> Result<Self, ProtocolError> {
        let msg = match op {
            op::DEPOSIT => VaultMsg::Deposit,
            op::CLAIM => VaultMsg::Claim {
                claim_amount: slice.load_coins()?,
                recipient: slice.load_address()?,
            },
            op::FIRST_CLAIM => VaultMsg::FirstClaim {
                claim_amount: slice.load_coins()?,
                recipient: slice.load_address()?,
            },
            op::BOOST => VaultMsg::Boost {
                user_address: slice.load_address()?,
                boost: slice.load_coins()?,
            },
            op::DEPLOY_PROXY => VaultMsg::DeployProxy {
                user_address: slice.load_address()?,
            },
            op::WITHDRAW_NATIVE => VaultMsg::WithdrawNative {
                amount: slice.load_coins()?,
            },
            op::WITHDRAW_TOKEN => VaultMsg::WithdrawToken {
                amount: slice.load_coins()?,
            },
            op::WITHDRAW_EMERGENCY => VaultMsg::WithdrawEmergency {
                token_amount: slice.load_coins()?,
            },
            op::WITHDRAW_PROXY_EMERGENCY => VaultMsg::WithdrawProxyEmergency {
                user_address: slice.load_address()?,
            },
            op::TRANSFER_NOTIFICATION => VaultMsg::TransferNotification {
                amount: slice.load_coins()?,
                from: slice.load_address()?,
            },
            op::EXCESS => VaultMsg::Excess,
            op => return Err(ProtocolError::UnknownOp { op }),
        };
        Ok(msg)
    }
}

/// Messages handled by a Proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProxyMsg {
    Claim,
    Boost { amount: Uint128 },
    WithdrawEmergency,
}

impl ActorMessage for ProxyMsg {
    fn op(&self) -> u32 {
        match self {
            ProxyMsg::Claim => op::CLAIM,
            ProxyMsg::Boost { .. } => op::BOOST,
            ProxyMsg::WithdrawEmergency => op::WITHDRAW_EMERGENCY,
        }
    }

    fn store_payload(&self, builder: &mut Builder) -> Result<(), ProtocolError> {
        if let ProxyMsg::Boost { amount } = self {
            builder.store_coins(*amount)?;
        }
        Ok(())
    }

    fn load_payload(op: u32, slice: &mut Slice) -> Result<Self, ProtocolError> {
        match op {
            op::CLAIM => Ok(ProxyMsg::Claim),
            op::BOOST => Ok(ProxyMsg::Boost {
                amount: slice.load_coins()?,
            }),
            op::WITHDRAW_EMERGENCY => Ok(ProxyMsg::WithdrawEmergency),
            op => Err(ProtocolError::UnknownOp { op }),
        }
    }
}
