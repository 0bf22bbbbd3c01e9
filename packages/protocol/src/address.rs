//! Registry-free Proxy addressing.
//!
//! A Proxy lives at the `instantiate2` address of (Proxy code checksum,
//! creator = its admin, salt = hash of its initial state). Anyone holding an
//! `Api` can compute it; the Vault recomputes it to authorize forwarded claims.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{instantiate2_address, Addr, Api, Binary, Uint128};
use sha2::{Digest, Sha256};

use crate::cell::Builder;
use crate::error::ProtocolError;

/// Fully specified initial persistent state of a Proxy.
#[cw_serde]
pub struct ProxyInitState {
    /// Vault that deploys and administers the Proxy
    pub admin: Addr,
    /// End user served by the Proxy
    pub user: Addr,
    /// Baseline tokens per claim
    pub claim_amount: Uint128,
    /// Denomination of the claim fee
    pub native_denom: String,
}

impl ProxyInitState {
    /// Canonical layout: `admin | user | coins claim_amount | uint64 last_transaction_time | denom`.
    pub fn to_cell(&self) -> Result<Builder, ProtocolError> {
        let mut builder = Builder::new();
        builder
            .store_address(self.admin.as_str())?
            .store_address(self.user.as_str())?
            .store_coins(self.claim_amount)?
            .store_u64(0)
            .store_address(&self.native_denom)?;
        Ok(builder)
    }

    /// SHA-256 over `bit_length:uint16 || cell bytes`
    pub fn salt(&self) -> Result<Binary, ProtocolError> {
        let cell = self.to_cell()?;
        let bit_len = u16::try_from(cell.bit_len()).map_err(|_| ProtocolError::Derivation {
            reason: "initial state too large".to_string(),
        })?;
        let mut hasher = Sha256::new();
        hasher.update(bit_len.to_be_bytes());
        hasher.update(cell.as_bytes());
        Ok(Binary::from(hasher.finalize().to_vec()))
    }
}

pub fn derive_proxy_address(
    api: &dyn Api,
    code_checksum: &[u8],
    init: &ProxyInitState,
) -> Result<Addr, ProtocolError> {
    let creator = api.addr_canonicalize(init.admin.as_str())?;
    let salt = init.salt()?;
    let canonical = instantiate2_address(code_checksum, &creator, salt.as_slice()).map_err(
        |err| ProtocolError::Derivation {
            reason: err.to_string(),
        },
    )?;
    Ok(api.addr_humanize(&canonical)?)
}
