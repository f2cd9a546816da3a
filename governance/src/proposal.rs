//! Governance proposals and their vote records.

use agora_types::{Address, Call, DescriptionHash, OperationId, ProposalId, TimeIndex, VoteSupport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weighted vote totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub against: u128,
    pub for_votes: u128,
    pub abstain: u128,
}

impl Tally {
    pub(crate) fn add(&mut self, support: VoteSupport, weight: u128) {
        let bucket = match support {
            VoteSupport::Against => &mut self.against,
            VoteSupport::For => &mut self.for_votes,
            VoteSupport::Abstain => &mut self.abstain,
        };
        *bucket = bucket.saturating_add(weight);
    }

    /// Weight counted toward quorum: `for` plus `abstain`.
    pub fn quorum_weight(&self) -> u128 {
        self.for_votes.saturating_add(self.abstain)
    }

    pub fn majority_for(&self) -> bool {
        self.for_votes > self.against
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub support: VoteSupport,
    pub weight: u128,
    pub reason: Option<String>,
    pub cast_at: TimeIndex,
}

/// Where a queued proposal sits in the timelock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedOperation {
    pub operation: OperationId,
    pub eta: TimeIndex,
    pub expires_at: TimeIndex,
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub calls: Vec<Call>,
    pub description: String,
    pub description_hash: DescriptionHash,
    /// Voting power is read at this index.
    pub snapshot: TimeIndex,
    pub vote_start: TimeIndex,
    /// First index at which voting is closed.
    pub vote_end: TimeIndex,
    pub tally: Tally,
    pub receipts: BTreeMap<Address, VoteReceipt>,
    pub canceled: bool,
    pub executed: bool,
    pub queued: Option<QueuedOperation>,
}

impl Proposal {
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.receipts.contains_key(voter)
    }
}
