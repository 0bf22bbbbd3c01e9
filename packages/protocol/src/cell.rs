//! Big-endian bit-packed serialization for message bodies and initial state.
//!
//! Fields are written most significant bit first with no alignment between
//! them; the final byte is zero-padded. Readers must know the layout.

use cosmwasm_std::{Binary, Uint128};

use crate::error::ProtocolError;

/// Longest coins value in bytes (4-bit length prefix)
pub const MAX_COINS_BYTES: usize = 15;

const ADDR_NONE: u8 = 0b00;
const ADDR_STD: u8 = 0b10;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Builder {
    data: Vec<u8>,
    bits: usize,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bits
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_binary(self) -> Binary {
        Binary::from(self.data)
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bits % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.bits / 8] |= 0x80 >> (self.bits % 8);
        }
        self.bits += 1;
    }

    // caller guarantees `value < 2^width`
    fn push_bits(&mut self, value: u128, width: usize) {
        for shift in (0..width).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
    }

    pub fn store_u8(&mut self, value: u8) -> &mut Self {
        self.push_bits(value.into(), 8);
        self
    }

    pub fn store_u16(&mut self, value: u16) -> &mut Self {
        self.push_bits(value.into(), 16);
        self
    }

    pub fn store_u32(&mut self, value: u32) -> &mut Self {
        self.push_bits(value.into(), 32);
        self
    }

    pub fn store_u64(&mut self, value: u64) -> &mut Self {
        self.push_bits(value.into(), 64);
        self
    }

    pub fn store_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        for byte in bytes {
            self.store_u8(*byte);
        }
        self
    }

    /// Variable-length amount: 4-bit byte count, then the big-endian bytes.
    pub fn store_coins(&mut self, amount: Uint128) -> Result<&mut Self, ProtocolError> {
        let value = amount.u128();
        let len = (128 - value.leading_zeros() as usize).div_ceil(8);
        if len > MAX_COINS_BYTES {
            return Err(ProtocolError::CoinsOverflow {});
        }
        self.push_bits(len as u128, 4);
        self.push_bits(value, len * 8);
        Ok(self)
    }

    pub fn store_address(&mut self, address: &str) -> Result<&mut Self, ProtocolError> {
        let bytes = address.as_bytes();
        let len = u8::try_from(bytes.len())
            .map_err(|_| ProtocolError::AddressTooLong { len: bytes.len() })?;
        self.push_bits(ADDR_STD.into(), 2);
        self.store_u8(len);
        Ok(self.store_bytes(bytes))
    }

    pub fn store_maybe_address(
        &mut self,
        address: Option<&str>,
    ) -> Result<&mut Self, ProtocolError> {
        match address {
            Some(address) => self.store_address(address),
            None => {
                self.push_bits(ADDR_NONE.into(), 2);
                Ok(self)
            }
        }
    }
}

/// Read cursor over a bit-packed body.
#[derive(Clone, Debug)]
pub struct Slice<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Slice<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    fn load_bits(&mut self, width: usize) -> Result<u128, ProtocolError> {
        if width > self.remaining_bits() {
            return Err(ProtocolError::CellUnderflow {});
        }
        let mut value = 0u128;
        for _ in 0..width {
            let bit = self.data[self.pos / 8] & (0x80 >> (self.pos % 8)) != 0;
            value = (value << 1) | u128::from(bit);
            self.pos += 1;
        }
        Ok(value)
    }

    pub fn load_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.load_bits(8)? as u8)
    }

    pub fn load_u32(&mut self) -> Result<u32, ProtocolError> {
        Ok(self.load_bits(32)? as u32)
    }

    pub fn load_u64(&mut self) -> Result<u64, ProtocolError> {
        Ok(self.load_bits(64)? as u64)
    }

    /// Rejects leading zero bytes so every amount has a single encoding.
    pub fn load_coins(&mut self) -> Result<Uint128, ProtocolError> {
        let len = self.load_bits(4)? as usize;
        let value = self.load_bits(len * 8)?;
        if len > 0 && value >> ((len - 1) * 8) == 0 {
            return Err(ProtocolError::NonCanonicalCoins { len });
        }
        Ok(Uint128::new(value))
    }

    pub fn load_maybe_address(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.load_bits(2)? as u8 {
            ADDR_NONE => Ok(None),
            ADDR_STD => {
                let len = self.load_u8()? as usize;
                let mut bytes = Vec::with_capacity(len);
                for _ in 0..len {
                    bytes.push(self.load_u8()?);
                }
                String::from_utf8(bytes)
                    .map(Some)
                    .map_err(|_| ProtocolError::InvalidAddress {})
            }
            tag => Err(ProtocolError::InvalidAddressTag { tag }),
        }
    }

    pub fn load_address(&mut self) -> Result<String, ProtocolError> {
        self.load_maybe_address()?
            .ok_or(ProtocolError::InvalidAddressTag { tag: ADDR_NONE })
    }

    /// Only the zero padding of the last byte may remain.
    pub fn end_parse(&mut self) -> Result<(), ProtocolError> {
        let rest = self.remaining_bits();
        if rest >= 8 || self.load_bits(rest)? != 0 {
            return Err(ProtocolError::TrailingData {});
        }
        Ok(())
    }
}
