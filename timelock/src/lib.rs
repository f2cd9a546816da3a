//! Timelock executor.
//!
//! Holds scheduled call batches, enforces the minimum delay, and runs each
//! batch at most once. Scheduling is restricted to proposer-role holders
//! (in a deployed system, only the governor); running is restricted to
//! executor-role holders, which may be opened to everyone with a wildcard
//! grant.
//!
//! A batch runs against a staged copy of its targets and is committed only
//! if every call succeeds.

pub mod error;
pub mod executor;

pub use error::TimelockError;
pub use executor::{ScheduleReceipt, ScheduledOperation, TimelockExecutor};
