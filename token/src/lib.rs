//! Voting token: the weight source for governance.
//!
//! Voting power is a token balance routed through delegation:
//! `votes(d) = Σ balance(a) for every a that delegated to d`.
//! Undelegated balances carry no voting power.
//!
//! This crate handles:
//! - Balance bookkeeping for minting and transfers
//! - Single-hop delegation (no transitive resolution)
//! - Append-only checkpoint histories per delegatee and for total supply
//! - The governor capability that gates minting
//! - The call payload codec the timelock uses to reach the token

pub mod call;
pub mod checkpoint;
pub mod error;
pub mod token;

pub use call::TokenCall;
pub use checkpoint::{Checkpoint, CheckpointHistory};
pub use error::TokenError;
pub use token::VotingToken;
