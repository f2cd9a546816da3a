//! Roles used by the access registry.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Grants and revokes every other role (and itself).
    Admin,
    /// May schedule operations on the timelock.
    Proposer,
    /// May run ready operations on the timelock.
    Executor,
    /// May cancel pending timelock operations.
    Canceller,
    /// May approve proposal content in the review gate.
    Reviewer,
}

impl Role {
    /// Whether a grant to [`Address::ANYONE`](crate::Address::ANYONE) opens this role to everybody.
    pub fn allows_wildcard(&self) -> bool {
        matches!(self, Self::Executor)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Proposer => "proposer",
            Self::Executor => "executor",
            Self::Canceller => "canceller",
            Self::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
