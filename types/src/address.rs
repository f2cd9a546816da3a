//! Identity type shared by accounts and components.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 20-byte identity. Accounts, the token, the timelock and the governor
/// are all addressed the same way.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("address must be 0x followed by 40 hex characters, got {0} characters")]
    InvalidLength(usize),

    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
}

impl Address {
    pub const LEN: usize = 20;

    /// The wildcard identity. Granting a role to it grants the role to every
    /// identity (only honoured for roles that allow it).
    pub const ANYONE: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_anyone(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Derive a stable identity from a human label (e.g. `"alice"`).
    ///
    /// Takes the first 20 bytes of `Blake2b-256(label)`.
    pub fn from_label(label: &str) -> Self {
        let digest = Blake2b::<U32>::digest(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[..20]);
        Self(bytes)
    }

    /// Parse a `0x`-prefixed (or bare) 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, ParseAddressError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        if raw.len() != Self::LEN * 2 {
            return Err(ParseAddressError::InvalidLength(raw.len()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(raw, &mut bytes)
            .map_err(|e| ParseAddressError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
