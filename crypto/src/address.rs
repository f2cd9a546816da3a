//! Component address derivation.
//!
//! Components deployed together (token, timelock, governor, review gate)
//! get addresses derived from the deployer and a component label, so a
//! redeploy by the same deployer reproduces the same identities.

use crate::hash::blake2b_256_multi;
use agora_types::Address;

const COMPONENT_TAG: &[u8] = b"agora/component/v1";

/// Derive the address of a component deployed by `deployer`.
///
/// Takes the first 20 bytes of `Blake2b-256(tag || deployer || label)`.
pub fn derive_address(deployer: &Address, label: &str) -> Address {
    let digest = blake2b_256_multi(&[COMPONENT_TAG, deployer.as_bytes(), label.as_bytes()]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest[..20]);
    Address::new(bytes)
}
