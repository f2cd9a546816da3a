//! Fundamental types for the Agora governance engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, content hashes, time indices, call batches, roles, lifecycle states,
//! and the deployment-time parameters.

pub mod address;
pub mod call;
pub mod hash;
pub mod params;
pub mod role;
pub mod state;
pub mod time;

pub use address::{Address, ParseAddressError};
pub use call::{Call, CallError, CallTarget, TargetRegistry};
pub use hash::{DescriptionHash, OperationId, ProposalId, SubmissionId};
pub use params::{GovernanceParams, TimelockParams, BPS_DENOMINATOR};
pub use role::Role;
pub use state::{OperationState, ProposalState, VoteSupport};
pub use time::TimeIndex;
