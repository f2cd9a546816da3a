//! Journal of governance events for auditing.

use agora_types::{Address, OperationId, ProposalId, TimeIndex, VoteSupport};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    ProposalCreated {
        proposal: ProposalId,
        proposer: Address,
        calls: usize,
        snapshot: TimeIndex,
        vote_start: TimeIndex,
        vote_end: TimeIndex,
        description: String,
    },
    VoteCast {
        voter: Address,
        proposal: ProposalId,
        support: VoteSupport,
        weight: u128,
        reason: Option<String>,
    },
    ProposalQueued {
        proposal: ProposalId,
        operation: OperationId,
        eta: TimeIndex,
    },
    ProposalExecuted {
        proposal: ProposalId,
        operation: OperationId,
    },
    ProposalCanceled {
        proposal: ProposalId,
        by: Address,
    },
}

impl GovernanceEvent {
    pub fn proposal(&self) -> ProposalId {
        match self {
            Self::ProposalCreated { proposal, .. }
            | Self::VoteCast { proposal, .. }
            | Self::ProposalQueued { proposal, .. }
            | Self::ProposalExecuted { proposal, .. }
            | Self::ProposalCanceled { proposal, .. } => *proposal,
        }
    }
}
