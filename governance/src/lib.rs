//! Token-weighted governance with review gating and timelocked execution.
//!
//! Lifecycle: Pending → Active → {Canceled | Defeated | Succeeded} → Queued → {Executed | Expired}
//!
//! A proposal is a batch of calls plus a description. Its key is a hash of
//! both, so reviewers approve exact contents. Votes are weighted by
//! delegated token balance at the proposal snapshot. A succeeded proposal
//! is scheduled on the timelock, and after the delay anyone with the
//! executor role may run it exactly once.

pub mod config;
pub mod dao;
pub mod engine;
pub mod error;
pub mod events;
pub mod proposal;
pub mod shared;

pub use config::DaoConfig;
pub use dao::Dao;
pub use engine::{GovernanceEngine, LedgerView, VotingPower};
pub use error::{ConfigError, GovernanceError};
pub use events::GovernanceEvent;
pub use proposal::{Proposal, QueuedOperation, Tally, VoteReceipt};
pub use shared::SharedDao;
