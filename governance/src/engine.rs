//! Core governance engine: moves proposals through their lifecycle.
//!
//! Lifecycle state is derived from the current time index, the vote tally
//! and the timelock's view of the queued operation, never stored
//! redundantly. The only stored transitions are `canceled`, `queued` and
//! `executed`.

use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use crate::proposal::{Proposal, QueuedOperation, Tally, VoteReceipt};
use agora_access::{AccessError, AccessRegistry};
use agora_review::ProposalGate;
use agora_timelock::{ScheduleReceipt, TimelockExecutor};
use agora_token::{TokenError, VotingToken};
use agora_types::{
    Address, Call, DescriptionHash, GovernanceParams, OperationId, OperationState, ProposalId,
    ProposalState, Role, TargetRegistry, TimeIndex, VoteSupport, BPS_DENOMINATOR,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Historical voting power, read at a strictly past time index.
pub trait VotingPower {
    fn past_votes(&self, account: &Address, at: TimeIndex, now: TimeIndex)
        -> Result<u128, TokenError>;

    fn past_total_supply(&self, at: TimeIndex, now: TimeIndex) -> Result<u128, TokenError>;
}

impl VotingPower for VotingToken {
    fn past_votes(
        &self,
        account: &Address,
        at: TimeIndex,
        now: TimeIndex,
    ) -> Result<u128, TokenError> {
        self.get_past_votes(account, at, now)
    }

    fn past_total_supply(&self, at: TimeIndex, now: TimeIndex) -> Result<u128, TokenError> {
        self.get_past_total_supply(at, now)
    }
}

/// Read-only view of the components a proposal's state depends on.
pub struct LedgerView<'a, V: ?Sized> {
    pub votes: &'a V,
    pub timelock: &'a TimelockExecutor,
}

impl<'a, V: ?Sized> LedgerView<'a, V> {
    pub fn new(votes: &'a V, timelock: &'a TimelockExecutor) -> Self {
        Self { votes, timelock }
    }
}

impl<V: ?Sized> Clone for LedgerView<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ?Sized> Copy for LedgerView<'_, V> {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceEngine {
    address: Address,
    params: GovernanceParams,
    access: AccessRegistry,
    proposals: BTreeMap<ProposalId, Proposal>,
    #[serde(skip)]
    events: Vec<GovernanceEvent>,
}

impl GovernanceEngine {
    /// `admins` may cancel any pending or active proposal.
    ///
    /// Voting must open strictly after the snapshot, so `voting_delay` is
    /// at least one.
    pub fn new(
        address: Address,
        params: GovernanceParams,
        admins: &[Address],
    ) -> Result<Self, GovernanceError> {
        if params.voting_delay < 1 {
            return Err(GovernanceError::InvalidParams("voting_delay must be at least 1"));
        }
        if params.voting_period < 1 {
            return Err(GovernanceError::InvalidParams("voting_period must be at least 1"));
        }
        if params.quorum_bps as u128 > BPS_DENOMINATOR {
            return Err(GovernanceError::InvalidParams("quorum_bps exceeds 10000"));
        }
        Ok(Self {
            address,
            params,
            access: AccessRegistry::new(admins),
            proposals: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn access(&self) -> &AccessRegistry {
        &self.access
    }

    pub fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        who: &Address,
    ) -> Result<bool, GovernanceError> {
        Ok(self.access.revoke_role(caller, role, who)?)
    }

    pub fn proposal(&self, id: &ProposalId) -> Option<&Proposal> {
        self.proposals.get(id)
    }

    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub fn hash_proposal(calls: &[Call], description_hash: &DescriptionHash) -> ProposalId {
        agora_crypto::hash_proposal(calls, description_hash)
    }

    /// Quorum for a snapshot taken at `at`.
    pub fn quorum<V: VotingPower + ?Sized>(
        &self,
        votes: &V,
        at: TimeIndex,
        now: TimeIndex,
    ) -> Result<u128, GovernanceError> {
        Ok(self.params.quorum_for(votes.past_total_supply(at, now)?))
    }

    /// Create a proposal in `Pending`. The snapshot is `now`.
    pub fn propose<G, V>(
        &mut self,
        gate: &G,
        view: LedgerView<'_, V>,
        proposer: Address,
        calls: Vec<Call>,
        description: &str,
        now: TimeIndex,
    ) -> Result<ProposalId, GovernanceError>
    where
        G: ProposalGate + ?Sized,
        V: VotingPower + ?Sized,
    {
        if calls.is_empty() {
            return Err(GovernanceError::EmptyProposal);
        }
        let description_hash = agora_crypto::hash_description(description);
        let id = Self::hash_proposal(&calls, &description_hash);
        if !gate.is_approved(&id) {
            return Err(GovernanceError::NotApproved(id));
        }
        if let Some(existing) = self.proposals.get(&id) {
            let state = self.derive_state(existing, view, now)?;
            if !matches!(
                state,
                ProposalState::Canceled | ProposalState::Defeated | ProposalState::Expired
            ) {
                return Err(GovernanceError::DuplicateProposal(id));
            }
        }
        let threshold = self.params.proposal_threshold;
        if threshold > 0 {
            let votes = match now.prev() {
                Some(at) => view.votes.past_votes(&proposer, at, now)?,
                None => 0,
            };
            if votes < threshold {
                return Err(GovernanceError::BelowThreshold { votes, threshold });
            }
        }

        let snapshot = now;
        let vote_start = snapshot.saturating_add(self.params.voting_delay);
        let vote_end = vote_start.saturating_add(self.params.voting_period);
        let call_count = calls.len();
        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer,
                calls,
                description: description.to_string(),
                description_hash,
                snapshot,
                vote_start,
                vote_end,
                tally: Tally::default(),
                receipts: BTreeMap::new(),
                canceled: false,
                executed: false,
                queued: None,
            },
        );
        self.events.push(GovernanceEvent::ProposalCreated {
            proposal: id,
            proposer,
            calls: call_count,
            snapshot,
            vote_start,
            vote_end,
            description: description.to_string(),
        });
        info!(
            proposal = %id,
            proposer = %proposer,
            calls = call_count,
            %vote_start,
            %vote_end,
            "proposal created"
        );
        Ok(id)
    }

    pub fn state<V: VotingPower + ?Sized>(
        &self,
        view: LedgerView<'_, V>,
        id: &ProposalId,
        now: TimeIndex,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self
            .proposals
            .get(id)
            .ok_or(GovernanceError::UnknownProposal(*id))?;
        self.derive_state(proposal, view, now)
    }

    /// Cast a vote weighted by the voter's power at the proposal snapshot.
    /// Returns the weight.
    pub fn cast_vote<V: VotingPower + ?Sized>(
        &mut self,
        view: LedgerView<'_, V>,
        id: ProposalId,
        voter: Address,
        support: VoteSupport,
        now: TimeIndex,
    ) -> Result<u128, GovernanceError> {
        self.cast_vote_with_reason(view, id, voter, support, None, now)
    }

    pub fn cast_vote_with_reason<V: VotingPower + ?Sized>(
        &mut self,
        view: LedgerView<'_, V>,
        id: ProposalId,
        voter: Address,
        support: VoteSupport,
        reason: Option<String>,
        now: TimeIndex,
    ) -> Result<u128, GovernanceError> {
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        let state = self.derive_state(proposal, view, now)?;
        if state != ProposalState::Active {
            return Err(GovernanceError::InvalidState {
                proposal: id,
                actual: state,
            });
        }
        if proposal.has_voted(&voter) {
            return Err(GovernanceError::AlreadyVoted {
                voter,
                proposal: id,
            });
        }
        let weight = view.votes.past_votes(&voter, proposal.snapshot, now)?;

        if let Some(proposal) = self.proposals.get_mut(&id) {
            proposal.tally.add(support, weight);
            proposal.receipts.insert(
                voter,
                VoteReceipt {
                    support,
                    weight,
                    reason: reason.clone(),
                    cast_at: now,
                },
            );
        }
        debug!(proposal = %id, voter = %voter, %support, weight, "vote cast");
        self.events.push(GovernanceEvent::VoteCast {
            voter,
            proposal: id,
            support,
            weight,
            reason,
        });
        Ok(weight)
    }

    /// Hand a succeeded proposal to the timelock with the minimum delay.
    pub fn queue<V: VotingPower + ?Sized>(
        &mut self,
        votes: &V,
        timelock: &mut TimelockExecutor,
        calls: &[Call],
        description_hash: DescriptionHash,
        now: TimeIndex,
    ) -> Result<ScheduleReceipt, GovernanceError> {
        let id = Self::hash_proposal(calls, &description_hash);
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        let state = self.derive_state(proposal, LedgerView::new(votes, &*timelock), now)?;
        if state != ProposalState::Succeeded {
            return Err(GovernanceError::InvalidState {
                proposal: id,
                actual: state,
            });
        }

        let salt = agora_crypto::governor_salt(&self.address, &description_hash);
        let delay = timelock.min_delay();
        let receipt = timelock.schedule(&self.address, calls, OperationId::ZERO, salt, delay, now)?;

        if let Some(proposal) = self.proposals.get_mut(&id) {
            proposal.queued = Some(QueuedOperation {
                operation: receipt.id,
                eta: receipt.ready_at,
                expires_at: receipt.expires_at,
            });
        }
        self.events.push(GovernanceEvent::ProposalQueued {
            proposal: id,
            operation: receipt.id,
            eta: receipt.ready_at,
        });
        info!(proposal = %id, operation = %receipt.id, eta = %receipt.ready_at, "proposal queued");
        Ok(receipt)
    }

    /// Run a queued proposal's batch through the timelock.
    ///
    /// `votes` is read only to report the state of a proposal that was
    /// never queued. A failing batch leaves the proposal `Queued`; the call
    /// may be retried.
    pub fn execute<V, R>(
        &mut self,
        votes: &V,
        timelock: &mut TimelockExecutor,
        targets: &mut R,
        calls: &[Call],
        description_hash: DescriptionHash,
        now: TimeIndex,
    ) -> Result<ProposalId, GovernanceError>
    where
        V: VotingPower + ?Sized,
        R: TargetRegistry + Clone,
    {
        let id = Self::hash_proposal(calls, &description_hash);
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        let state = self.derive_state(proposal, LedgerView::new(votes, &*timelock), now)?;
        let operation = match (state, proposal.queued) {
            (ProposalState::Queued, Some(queued)) => queued.operation,
            (ProposalState::Executed, _) => return Err(GovernanceError::AlreadyExecuted(id)),
            (actual, _) => return Err(GovernanceError::InvalidState { proposal: id, actual }),
        };

        let salt = agora_crypto::governor_salt(&self.address, &description_hash);
        timelock.run(&self.address, calls, OperationId::ZERO, salt, now, targets)?;

        if let Some(proposal) = self.proposals.get_mut(&id) {
            proposal.executed = true;
        }
        self.events.push(GovernanceEvent::ProposalExecuted {
            proposal: id,
            operation,
        });
        info!(proposal = %id, %operation, "proposal executed");
        Ok(id)
    }

    /// Cancel a pending or active proposal. Proposer or admin only.
    pub fn cancel<V: VotingPower + ?Sized>(
        &mut self,
        view: LedgerView<'_, V>,
        caller: &Address,
        id: &ProposalId,
        now: TimeIndex,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get(id)
            .ok_or(GovernanceError::UnknownProposal(*id))?;
        if proposal.proposer != *caller && !self.access.has_role(Role::Admin, caller) {
            return Err(AccessError::Unauthorized {
                caller: *caller,
                role: Role::Admin,
            }
            .into());
        }
        let state = self.derive_state(proposal, view, now)?;
        if !matches!(state, ProposalState::Pending | ProposalState::Active) {
            return Err(GovernanceError::InvalidState {
                proposal: *id,
                actual: state,
            });
        }

        if let Some(proposal) = self.proposals.get_mut(id) {
            proposal.canceled = true;
        }
        self.events.push(GovernanceEvent::ProposalCanceled {
            proposal: *id,
            by: *caller,
        });
        info!(proposal = %id, by = %caller, "proposal canceled");
        Ok(())
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.proposals
            .get(id)
            .is_some_and(|p| p.has_voted(voter))
    }

    pub fn receipt(&self, id: &ProposalId, voter: &Address) -> Option<&VoteReceipt> {
        self.proposals.get(id).and_then(|p| p.receipts.get(voter))
    }

    /// `(against, for, abstain)` weights.
    pub fn proposal_votes(&self, id: &ProposalId) -> Option<(u128, u128, u128)> {
        self.proposals
            .get(id)
            .map(|p| (p.tally.against, p.tally.for_votes, p.tally.abstain))
    }

    pub fn events(&self) -> &[GovernanceEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.events)
    }

    /// State that does not depend on the tally, if any.
    fn settled_state(
        &self,
        proposal: &Proposal,
        timelock: &TimelockExecutor,
        now: TimeIndex,
    ) -> Option<ProposalState> {
        if proposal.executed {
            return Some(ProposalState::Executed);
        }
        if proposal.canceled {
            return Some(ProposalState::Canceled);
        }
        if now < proposal.vote_start {
            return Some(ProposalState::Pending);
        }
        if now < proposal.vote_end {
            return Some(ProposalState::Active);
        }
        let queued = proposal.queued?;
        Some(match timelock.operation_state(&queued.operation, now) {
            OperationState::Done => ProposalState::Executed,
            OperationState::Waiting | OperationState::Ready => ProposalState::Queued,
            OperationState::Expired => ProposalState::Expired,
            // dropped from the timelock by a canceller
            OperationState::Unset => ProposalState::Canceled,
        })
    }

    fn derive_state<V: VotingPower + ?Sized>(
        &self,
        proposal: &Proposal,
        view: LedgerView<'_, V>,
        now: TimeIndex,
    ) -> Result<ProposalState, GovernanceError> {
        if let Some(state) = self.settled_state(proposal, view.timelock, now) {
            return Ok(state);
        }
        let quorum = self.quorum(view.votes, proposal.snapshot, now)?;
        let tally = &proposal.tally;
        if tally.quorum_weight() >= quorum && tally.majority_for() {
            Ok(ProposalState::Succeeded)
        } else {
            Ok(ProposalState::Defeated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_review::{OpenGate, ReviewGate};
    use agora_timelock::TimelockError;
    use agora_token::TokenCall;
    use agora_types::TimelockParams;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    fn t(i: u64) -> TimeIndex {
        TimeIndex::new(i)
    }

    struct World {
        token: VotingToken,
        timelock: TimelockExecutor,
        engine: GovernanceEngine,
    }

    impl World {
        fn view(&self) -> LedgerView<'_, VotingToken> {
            LedgerView::new(&self.token, &self.timelock)
        }

        fn propose(
            &mut self,
            calls: Vec<Call>,
            description: &str,
            now: TimeIndex,
        ) -> Result<ProposalId, GovernanceError> {
            let view = LedgerView::new(&self.token, &self.timelock);
            self.engine
                .propose(&OpenGate, view, addr("owner"), calls, description, now)
        }

        fn vote(
            &mut self,
            id: ProposalId,
            voter: &str,
            support: VoteSupport,
            now: TimeIndex,
        ) -> Result<u128, GovernanceError> {
            let view = LedgerView::new(&self.token, &self.timelock);
            self.engine.cast_vote(view, id, addr(voter), support, now)
        }

        fn state(&self, id: &ProposalId, now: TimeIndex) -> ProposalState {
            self.engine.state(self.view(), id, now).unwrap()
        }

        /// Votes are read from the committed token, calls land on a staged copy.
        fn execute(
            &mut self,
            calls: &[Call],
            hash: DescriptionHash,
            now: TimeIndex,
        ) -> Result<ProposalId, GovernanceError> {
            let mut staged = self.token.clone();
            let id = self
                .engine
                .execute(&self.token, &mut self.timelock, &mut staged, calls, hash, now)?;
            self.token = staged;
            Ok(id)
        }
    }

    /// owner holds 10_000 and bob 2_000, both self-delegated at t0.
    fn world(params: GovernanceParams) -> World {
        let owner = addr("owner");
        let mut token = VotingToken::new(addr("token"), "MyToken", "MTK", owner);
        token.mint(&owner, owner, 10_000, t(0)).unwrap();
        token.mint(&owner, addr("bob"), 2_000, t(0)).unwrap();
        token.delegate(&owner, owner, t(0)).unwrap();
        token.delegate(&addr("bob"), addr("bob"), t(0)).unwrap();
        token.set_governor(&owner, addr("timelock")).unwrap();
        let timelock = TimelockExecutor::new(
            addr("timelock"),
            TimelockParams {
                min_delay: 10,
                grace_period: 100,
            },
            &[addr("governor")],
            &[Address::ANYONE],
            None,
        )
        .unwrap();
        let engine =
            GovernanceEngine::new(addr("governor"), params, &[addr("timelock"), addr("admin")])
                .unwrap();
        World {
            token,
            timelock,
            engine,
        }
    }

    fn params() -> GovernanceParams {
        GovernanceParams {
            voting_delay: 1,
            voting_period: 5,
            quorum_bps: 400,
            proposal_threshold: 0,
        }
    }

    fn mint(amount: u128) -> Vec<Call> {
        vec![Call::new(
            addr("token"),
            0,
            TokenCall::Mint {
                to: addr("owner"),
                amount,
            }
            .encode()
            .unwrap(),
        )]
    }

    #[test]
    fn proposal_moves_through_pending_and_active() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        let proposal = w.engine.proposal(&id).unwrap();
        assert_eq!(proposal.snapshot, t(1));
        assert_eq!(proposal.vote_start, t(2));
        assert_eq!(proposal.vote_end, t(7));
        assert_eq!(w.state(&id, t(1)), ProposalState::Pending);
        assert_eq!(w.state(&id, t(2)), ProposalState::Active);
        assert_eq!(w.state(&id, t(6)), ProposalState::Active);
        assert_eq!(w.state(&id, t(7)), ProposalState::Defeated);
    }

    #[test]
    fn full_lifecycle_executes_once() {
        let mut w = world(params());
        let calls = mint(25_000);
        let id = w.propose(calls.clone(), "Give the owner more tokens!", t(1)).unwrap();
        assert_eq!(w.vote(id, "owner", VoteSupport::For, t(2)).unwrap(), 10_000);
        assert_eq!(w.state(&id, t(7)), ProposalState::Succeeded);

        let hash = agora_crypto::hash_description("Give the owner more tokens!");
        let receipt = w
            .engine
            .queue(&w.token, &mut w.timelock, &calls, hash, t(7))
            .unwrap();
        assert_eq!(receipt.ready_at, t(17));
        assert_eq!(w.state(&id, t(8)), ProposalState::Queued);

        let err = w.execute(&calls, hash, t(16)).unwrap_err();
        assert!(matches!(
            err,
            GovernanceError::Timelock(TimelockError::NotReady { .. })
        ));
        assert_eq!(w.token.balance_of(&addr("owner")), 10_000);

        w.execute(&calls, hash, t(17)).unwrap();
        assert_eq!(w.token.balance_of(&addr("owner")), 35_000);
        assert_eq!(w.state(&id, t(18)), ProposalState::Executed);
        assert!(matches!(
            w.execute(&calls, hash, t(18)),
            Err(GovernanceError::AlreadyExecuted(found)) if found == id
        ));
        assert_eq!(w.token.balance_of(&addr("owner")), 35_000);
    }

    #[test]
    fn unapproved_content_rejected() {
        let mut w = world(params());
        let gate = ReviewGate::new(addr("review"), addr("admin"));
        let view = LedgerView::new(&w.token, &w.timelock);
        assert!(matches!(
            w.engine
                .propose(&gate, view, addr("owner"), mint(1), "mint", t(1)),
            Err(GovernanceError::NotApproved(_))
        ));
        assert_eq!(w.engine.proposals().count(), 0);
    }

    #[test]
    fn empty_proposal_rejected() {
        let mut w = world(params());
        assert!(matches!(
            w.propose(vec![], "nothing", t(1)),
            Err(GovernanceError::EmptyProposal)
        ));
    }

    #[test]
    fn duplicate_live_proposal_rejected() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        assert!(matches!(
            w.propose(mint(1), "mint", t(2)),
            Err(GovernanceError::DuplicateProposal(found)) if found == id
        ));
        // a different description is a different key
        assert!(w.propose(mint(1), "mint.", t(2)).is_ok());
    }

    #[test]
    fn defeated_proposal_can_be_resubmitted() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        assert_eq!(w.state(&id, t(7)), ProposalState::Defeated);
        let again = w.propose(mint(1), "mint", t(7)).unwrap();
        assert_eq!(again, id);
        assert_eq!(w.state(&id, t(7)), ProposalState::Pending);
    }

    #[test]
    fn double_vote_rejected_and_counted_once() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        w.vote(id, "owner", VoteSupport::For, t(2)).unwrap();
        assert!(matches!(
            w.vote(id, "owner", VoteSupport::Against, t(3)),
            Err(GovernanceError::AlreadyVoted { .. })
        ));
        assert_eq!(w.engine.proposal_votes(&id), Some((0, 10_000, 0)));
        assert!(w.engine.has_voted(&id, &addr("owner")));
        assert!(!w.engine.has_voted(&id, &addr("bob")));
    }

    #[test]
    fn vote_outside_window_rejected() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        assert!(matches!(
            w.vote(id, "owner", VoteSupport::For, t(1)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Pending,
                ..
            })
        ));
        assert!(matches!(
            w.vote(id, "owner", VoteSupport::For, t(7)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Defeated,
                ..
            })
        ));
    }

    #[test]
    fn weight_is_read_at_snapshot() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        // bob receives owner's tokens after the snapshot
        w.token
            .transfer(&addr("owner"), addr("bob"), 10_000, t(2))
            .unwrap();
        assert_eq!(w.vote(id, "bob", VoteSupport::Against, t(3)).unwrap(), 2_000);
        assert_eq!(w.vote(id, "owner", VoteSupport::For, t(3)).unwrap(), 10_000);
        assert_eq!(w.state(&id, t(7)), ProposalState::Succeeded);
    }

    #[test]
    fn against_majority_defeats() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        w.vote(id, "bob", VoteSupport::For, t(2)).unwrap();
        w.vote(id, "owner", VoteSupport::Against, t(2)).unwrap();
        assert_eq!(w.state(&id, t(7)), ProposalState::Defeated);
    }

    #[test]
    fn quorum_counts_for_and_abstain() {
        // 4% of 12_300 = 492; carol's 300 alone cannot reach it
        let mut w = world(params());
        let owner = addr("owner");
        w.token.set_governor(&addr("timelock"), owner).unwrap();
        w.token.mint(&owner, addr("carol"), 300, t(0)).unwrap();
        w.token.delegate(&addr("carol"), addr("carol"), t(0)).unwrap();

        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        w.vote(id, "carol", VoteSupport::For, t(2)).unwrap();
        assert_eq!(w.state(&id, t(7)), ProposalState::Defeated);

        let id = w.propose(mint(2), "mint", t(1)).unwrap();
        w.vote(id, "carol", VoteSupport::For, t(2)).unwrap();
        w.vote(id, "bob", VoteSupport::Abstain, t(2)).unwrap();
        assert_eq!(w.state(&id, t(7)), ProposalState::Succeeded);
    }

    #[test]
    fn threshold_checked_one_index_back() {
        let mut w = world(GovernanceParams {
            proposal_threshold: 5_000,
            ..params()
        });
        let view = LedgerView::new(&w.token, &w.timelock);
        assert!(matches!(
            w.engine
                .propose(&OpenGate, view, addr("bob"), mint(1), "mint", t(1)),
            Err(GovernanceError::BelowThreshold {
                votes: 2_000,
                threshold: 5_000
            })
        ));
        assert!(matches!(
            w.engine
                .propose(&OpenGate, view, addr("owner"), mint(1), "mint", t(0)),
            Err(GovernanceError::BelowThreshold { votes: 0, .. })
        ));
        assert!(w
            .engine
            .propose(&OpenGate, view, addr("owner"), mint(1), "mint", t(1))
            .is_ok());
    }

    #[test]
    fn cancel_rules() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        let view = LedgerView::new(&w.token, &w.timelock);
        assert!(matches!(
            w.engine.cancel(view, &addr("bob"), &id, t(1)),
            Err(GovernanceError::Unauthorized(_))
        ));
        w.engine.cancel(view, &addr("admin"), &id, t(2)).unwrap();
        assert_eq!(w.state(&id, t(3)), ProposalState::Canceled);
        assert!(matches!(
            w.vote(id, "owner", VoteSupport::For, t(3)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Canceled,
                ..
            })
        ));

        let id = w.propose(mint(1), "mint", t(3)).unwrap();
        w.vote(id, "owner", VoteSupport::For, t(4)).unwrap();
        let view = LedgerView::new(&w.token, &w.timelock);
        assert!(matches!(
            w.engine.cancel(view, &addr("owner"), &id, t(9)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Succeeded,
                ..
            })
        ));
    }

    #[test]
    fn queue_requires_success() {
        let mut w = world(params());
        let calls = mint(1);
        let id = w.propose(calls.clone(), "mint", t(1)).unwrap();
        let hash = agora_crypto::hash_description("mint");
        assert!(matches!(
            w.engine.queue(&w.token, &mut w.timelock, &calls, hash, t(3)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Active,
                ..
            })
        ));
        assert_eq!(w.state(&id, t(8)), ProposalState::Defeated);
        assert!(matches!(
            w.execute(&calls, hash, t(8)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Defeated,
                ..
            })
        ));
    }

    #[test]
    fn execute_before_queue_reports_state() {
        let mut w = world(params());
        let calls = mint(1);
        let id = w.propose(calls.clone(), "mint", t(1)).unwrap();
        let hash = agora_crypto::hash_description("mint");
        assert!(matches!(
            w.execute(&calls, hash, t(1)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Pending,
                ..
            })
        ));
        w.vote(id, "owner", VoteSupport::For, t(2)).unwrap();
        assert_eq!(w.state(&id, t(7)), ProposalState::Succeeded);
        assert!(matches!(
            w.execute(&calls, hash, t(7)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Succeeded,
                ..
            })
        ));
        assert_eq!(w.token.balance_of(&addr("owner")), 10_000);
    }

    #[test]
    fn zero_voting_delay_rejected() {
        let zero_delay = GovernanceParams {
            voting_delay: 0,
            ..params()
        };
        assert!(matches!(
            GovernanceEngine::new(addr("governor"), zero_delay, &[]),
            Err(GovernanceError::InvalidParams(_))
        ));
        let zero_period = GovernanceParams {
            voting_period: 0,
            ..params()
        };
        assert!(matches!(
            GovernanceEngine::new(addr("governor"), zero_period, &[]),
            Err(GovernanceError::InvalidParams(_))
        ));
    }

    #[test]
    fn unexecuted_queue_expires() {
        let mut w = world(params());
        let calls = mint(1);
        let id = w.propose(calls.clone(), "mint", t(1)).unwrap();
        w.vote(id, "owner", VoteSupport::For, t(2)).unwrap();
        let hash = agora_crypto::hash_description("mint");
        w.engine
            .queue(&w.token, &mut w.timelock, &calls, hash, t(7))
            .unwrap();
        // ready at 17, grace 100
        assert_eq!(w.state(&id, t(116)), ProposalState::Queued);
        assert_eq!(w.state(&id, t(117)), ProposalState::Expired);
        assert!(matches!(
            w.execute(&calls, hash, t(117)),
            Err(GovernanceError::InvalidState {
                actual: ProposalState::Expired,
                ..
            })
        ));
    }

    #[test]
    fn events_are_journaled() {
        let mut w = world(params());
        let id = w.propose(mint(1), "mint", t(1)).unwrap();
        let view = LedgerView::new(&w.token, &w.timelock);
        w.engine
            .cast_vote_with_reason(
                view,
                id,
                addr("owner"),
                VoteSupport::For,
                Some("yes".into()),
                t(2),
            )
            .unwrap();
        let events = w.engine.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GovernanceEvent::ProposalCreated { .. }));
        assert_eq!(
            events[1],
            GovernanceEvent::VoteCast {
                voter: addr("owner"),
                proposal: id,
                support: VoteSupport::For,
                weight: 10_000,
                reason: Some("yes".into()),
            }
        );
        assert!(w.engine.events().is_empty());
        assert_eq!(
            w.engine.receipt(&id, &addr("owner")).and_then(|r| r.reason.clone()),
            Some("yes".into())
        );
    }
}
