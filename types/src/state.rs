//! Lifecycle enums for proposals, timelock operations and votes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The derived state of a governance proposal.
///
/// Numbering matches the conventional Governor ordering so external
/// tooling can display it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Created; voting has not opened yet.
    Pending,
    /// Voting window is open.
    Active,
    /// Canceled by the proposer or an admin before voting closed.
    Canceled,
    /// Voting closed without quorum, or against >= for.
    Defeated,
    /// Voting closed with quorum and a for-majority; not yet queued.
    Succeeded,
    /// Scheduled on the timelock, awaiting execution.
    Queued,
    /// Queued but not executed within the grace window.
    Expired,
    /// Batch executed.
    Executed,
}

impl ProposalState {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Canceled => 2,
            Self::Defeated => 3,
            Self::Succeeded => 4,
            Self::Queued => 5,
            Self::Expired => 6,
            Self::Executed => 7,
        }
    }

    /// No further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::Defeated | Self::Expired | Self::Executed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Expired => "expired",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state of a timelock operation at a given time index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    /// Never scheduled, or canceled.
    Unset,
    /// Scheduled; ready-time not reached.
    Waiting,
    /// Ready-time reached, inside the grace window.
    Ready,
    /// Ready-time plus grace window elapsed without execution.
    Expired,
    /// Executed.
    Done,
}

impl OperationState {
    /// Scheduled and neither executed nor expired.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Waiting | Self::Ready)
    }
}

/// Vote direction, using the simple-counting encoding (0/1/2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteSupport {
    Against,
    For,
    Abstain,
}

impl VoteSupport {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Against),
            1 => Some(Self::For),
            2 => Some(Self::Abstain),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Against => 0,
            Self::For => 1,
            Self::Abstain => 2,
        }
    }
}

impl fmt::Display for VoteSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Against => "against",
            Self::For => "for",
            Self::Abstain => "abstain",
        })
    }
}
