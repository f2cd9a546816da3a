//! Deployed DAO: the token, review gate, timelock and governor wired together.

use crate::config::DaoConfig;
use crate::engine::{GovernanceEngine, LedgerView};
use crate::error::GovernanceError;
use crate::events::GovernanceEvent;
use agora_crypto::derive_address;
use agora_review::{OpenGate, ReviewGate};
use agora_timelock::{ScheduleReceipt, TimelockExecutor};
use agora_token::VotingToken;
use agora_types::{
    Address, Call, ProposalId, ProposalState, Role, SubmissionId, TimeIndex, VoteSupport,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dao {
    config: DaoConfig,
    deployer: Address,
    /// Highest time index any operation has been accepted at.
    clock: TimeIndex,
    token: VotingToken,
    review: ReviewGate,
    timelock: TimelockExecutor,
    governor: GovernanceEngine,
}

impl Dao {
    /// Deploy and wire all components.
    ///
    /// The deployer receives the initial supply and keeps reviewer
    /// management. The governor becomes the timelock's only proposer and
    /// canceller, and the token's mint capability ends up with the timelock.
    pub fn deploy(
        deployer: Address,
        config: DaoConfig,
        now: TimeIndex,
    ) -> Result<Self, GovernanceError> {
        config.validate()?;
        let token_address = derive_address(&deployer, "token");
        let timelock_address = derive_address(&deployer, "timelock");
        let governor_address = derive_address(&deployer, "governor");
        let review_address = derive_address(&deployer, "review");

        let mut token = VotingToken::new(
            token_address,
            &config.token_name,
            &config.token_symbol,
            deployer,
        );
        if config.initial_supply > 0 {
            token.mint(&deployer, deployer, config.initial_supply as u128, now)?;
        }

        let executor = if config.open_execution {
            Address::ANYONE
        } else {
            governor_address
        };
        let mut timelock = TimelockExecutor::new(
            timelock_address,
            config.timelock_params(),
            &[governor_address],
            &[executor],
            Some(deployer),
        )?;

        let mut governor_admins = vec![timelock_address];
        if !config.renounce_deployer_admin {
            governor_admins.push(deployer);
        }
        let governor =
            GovernanceEngine::new(governor_address, config.governance_params(), &governor_admins)?;
        let review = ReviewGate::new(review_address, deployer);

        if config.renounce_deployer_admin {
            timelock.revoke_role(&deployer, Role::Admin, &deployer)?;
        }
        token.set_governor(&deployer, timelock_address)?;

        info!(
            deployer = %deployer,
            token = %token_address,
            timelock = %timelock_address,
            governor = %governor_address,
            review = %review_address,
            "dao deployed"
        );
        Ok(Self {
            config,
            deployer,
            clock: now,
            token,
            review,
            timelock,
            governor,
        })
    }

    pub fn config(&self) -> &DaoConfig {
        &self.config
    }

    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Latest time index an operation was accepted at. Operations stamped
    /// earlier are refused, so a snapshot that has been read stays final.
    pub fn clock(&self) -> TimeIndex {
        self.clock
    }

    pub fn token(&self) -> &VotingToken {
        &self.token
    }

    pub fn review(&self) -> &ReviewGate {
        &self.review
    }

    pub fn timelock(&self) -> &TimelockExecutor {
        &self.timelock
    }

    pub fn governor(&self) -> &GovernanceEngine {
        &self.governor
    }

    pub fn view(&self) -> LedgerView<'_, VotingToken> {
        LedgerView::new(&self.token, &self.timelock)
    }

    /// Key a proposal with these contents would have.
    pub fn proposal_key(calls: &[Call], description: &str) -> ProposalId {
        GovernanceEngine::hash_proposal(calls, &agora_crypto::hash_description(description))
    }

    // ── Token ────────────────────────────────────────────────────────────

    pub fn delegate(
        &mut self,
        delegator: &Address,
        delegatee: Address,
        now: TimeIndex,
    ) -> Result<(), GovernanceError> {
        self.at(now, |dao| Ok(dao.token.delegate(delegator, delegatee, now)?))
    }

    pub fn transfer(
        &mut self,
        from: &Address,
        to: Address,
        amount: u128,
        now: TimeIndex,
    ) -> Result<(), GovernanceError> {
        self.at(now, |dao| Ok(dao.token.transfer(from, to, amount, now)?))
    }

    // ── Review ───────────────────────────────────────────────────────────

    pub fn add_reviewer(
        &mut self,
        caller: &Address,
        reviewer: Address,
    ) -> Result<(), GovernanceError> {
        Ok(self.review.add_reviewer(caller, reviewer)?)
    }

    pub fn remove_reviewer(
        &mut self,
        caller: &Address,
        reviewer: &Address,
    ) -> Result<(), GovernanceError> {
        Ok(self.review.remove_reviewer(caller, reviewer)?)
    }

    pub fn submit_for_review(
        &mut self,
        submitter: Address,
        title: &str,
        calls: Vec<Call>,
        description: &str,
        metadata: &str,
        now: TimeIndex,
    ) -> Result<SubmissionId, GovernanceError> {
        self.at(now, |dao| {
            Ok(dao
                .review
                .submit_for_review(submitter, title, calls, description, metadata, now)?)
        })
    }

    pub fn approve(
        &mut self,
        reviewer: &Address,
        proposal: ProposalId,
        now: TimeIndex,
    ) -> Result<(), GovernanceError> {
        self.at(now, |dao| Ok(dao.review.approve(reviewer, proposal, now)?))
    }

    pub fn revoke_approval(
        &mut self,
        reviewer: &Address,
        proposal: &ProposalId,
        now: TimeIndex,
    ) -> Result<(), GovernanceError> {
        self.at(now, |dao| Ok(dao.review.revoke_approval(reviewer, proposal, now)?))
    }

    // ── Governance ───────────────────────────────────────────────────────

    pub fn propose(
        &mut self,
        proposer: Address,
        calls: Vec<Call>,
        description: &str,
        now: TimeIndex,
    ) -> Result<ProposalId, GovernanceError> {
        self.at(now, |dao| {
            let view = LedgerView::new(&dao.token, &dao.timelock);
            if dao.config.require_review {
                dao.governor
                    .propose(&dao.review, view, proposer, calls, description, now)
            } else {
                dao.governor
                    .propose(&OpenGate, view, proposer, calls, description, now)
            }
        })
    }

    pub fn cast_vote(
        &mut self,
        voter: Address,
        proposal: ProposalId,
        support: VoteSupport,
        reason: Option<String>,
        now: TimeIndex,
    ) -> Result<u128, GovernanceError> {
        self.at(now, |dao| {
            let view = LedgerView::new(&dao.token, &dao.timelock);
            dao.governor
                .cast_vote_with_reason(view, proposal, voter, support, reason, now)
        })
    }

    pub fn queue(
        &mut self,
        calls: &[Call],
        description: &str,
        now: TimeIndex,
    ) -> Result<ScheduleReceipt, GovernanceError> {
        let description_hash = agora_crypto::hash_description(description);
        self.at(now, |dao| {
            dao.governor
                .queue(&dao.token, &mut dao.timelock, calls, description_hash, now)
        })
    }

    /// Execute a queued proposal. Callable by anyone; the timelock
    /// performs the calls.
    pub fn execute(
        &mut self,
        calls: &[Call],
        description: &str,
        now: TimeIndex,
    ) -> Result<ProposalId, GovernanceError> {
        let description_hash = agora_crypto::hash_description(description);
        self.at(now, |dao| {
            // votes are read from the committed token, the batch runs on a copy
            let mut staged = dao.token.clone();
            let id = dao.governor.execute(
                &dao.token,
                &mut dao.timelock,
                &mut staged,
                calls,
                description_hash,
                now,
            )?;
            dao.token = staged;
            Ok(id)
        })
    }

    pub fn cancel(
        &mut self,
        caller: &Address,
        proposal: &ProposalId,
        now: TimeIndex,
    ) -> Result<(), GovernanceError> {
        self.at(now, |dao| {
            let view = LedgerView::new(&dao.token, &dao.timelock);
            dao.governor.cancel(view, caller, proposal, now)
        })
    }

    pub fn state(
        &self,
        proposal: &ProposalId,
        now: TimeIndex,
    ) -> Result<ProposalState, GovernanceError> {
        self.governor.state(self.view(), proposal, now)
    }

    pub fn has_voted(&self, proposal: &ProposalId, voter: &Address) -> bool {
        self.governor.has_voted(proposal, voter)
    }

    pub fn proposal_votes(&self, proposal: &ProposalId) -> Option<(u128, u128, u128)> {
        self.governor.proposal_votes(proposal)
    }

    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        self.governor.drain_events()
    }

    /// Run `op` at `now`, refusing indices older than the clock. The clock
    /// only moves when the operation succeeds.
    fn at<T>(
        &mut self,
        now: TimeIndex,
        op: impl FnOnce(&mut Self) -> Result<T, GovernanceError>,
    ) -> Result<T, GovernanceError> {
        if now < self.clock {
            return Err(GovernanceError::TimeRegression {
                now,
                last: self.clock,
            });
        }
        let out = op(self)?;
        self.clock = now;
        Ok(out)
    }

    // ── Persistence ──────────────────────────────────────────────────────

    /// Serialize every component's state. The event journal is not kept.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn load_state(bytes: &[u8]) -> Result<Self, GovernanceError> {
        let dao: Self = bincode::deserialize(bytes)?;
        dao.config.validate()?;
        Ok(dao)
    }
}
