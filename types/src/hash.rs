//! Content-derived 32-byte identifiers.
//!
//! Every persisted key in the system is one of these: proposal keys,
//! timelock operation ids, description hashes and review submission ids.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! hash_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const ZERO: Self = Self([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            /// Parse a `0x`-prefixed (or bare) 64-character hex string.
            pub fn from_hex(s: &str) -> Option<Self> {
                let raw = s.strip_prefix("0x").unwrap_or(s);
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(raw, &mut bytes).ok()?;
                Some(Self(bytes))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }
    };
}

hash_type!(
    /// Deterministic key of a proposal: hash of `(targets, values, payloads, description hash)`.
    ProposalId
);

hash_type!(
    /// Timelock operation id: hash of the call batch, predecessor and salt.
    OperationId
);

hash_type!(
    /// Hash of a proposal's free-text description.
    DescriptionHash
);

hash_type!(
    /// Identifier of an informational review submission.
    SubmissionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_roundtrip() {
        let id = ProposalId::new([7u8; 32]);
        assert_eq!(ProposalId::from_hex(&id.to_string()), Some(id));
    }

    #[test]
    fn hex_parse_rejects_wrong_length() {
        assert_eq!(OperationId::from_hex("0x1234"), None);
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = OperationId::new([0xab; 32]);
        assert_eq!(format!("{id:?}"), "OperationId(abababab)");
    }
}
