//! Content hashing for the Agora governance engine.
//!
//! - **Blake2b-256** for every content-derived key
//! - Proposal keys over `(targets, values, payloads, description hash)`
//! - Timelock operation ids salted with a predecessor dependency
//! - Component address derivation from the deployer identity

pub mod address;
pub mod hash;

pub use address::derive_address;
pub use hash::{
    blake2b_256, blake2b_256_multi, governor_salt, hash_description, hash_operation,
    hash_proposal, submission_id,
};
