//! Reviewer approval records keyed by proposal key.

use crate::error::ReviewError;
use agora_access::AccessRegistry;
use agora_types::{Address, Call, ProposalId, Role, SubmissionId, TimeIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Consulted by the governor when a proposal is created.
pub trait ProposalGate {
    fn is_approved(&self, proposal: &ProposalId) -> bool;
}

/// Gate for deployments without review: every key is approved.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGate;

impl ProposalGate for OpenGate {
    fn is_approved(&self, _proposal: &ProposalId) -> bool {
        true
    }
}

/// Informational record of content someone asked to have reviewed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub submitter: Address,
    pub title: String,
    pub calls: Vec<Call>,
    pub description: String,
    pub metadata: String,
    /// Key the content would have as a proposal.
    pub proposal: ProposalId,
    pub submitted_at: TimeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub proposal: ProposalId,
    pub approved: bool,
    /// Reviewer who last changed the record.
    pub reviewer: Address,
    pub updated_at: TimeIndex,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewGate {
    address: Address,
    access: AccessRegistry,
    submissions: BTreeMap<SubmissionId, Submission>,
    records: BTreeMap<ProposalId, ReviewRecord>,
}

impl ReviewGate {
    /// `admin` manages the reviewer set.
    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            access: AccessRegistry::new(&[admin]),
            submissions: BTreeMap::new(),
            records: BTreeMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn access(&self) -> &AccessRegistry {
        &self.access
    }

    pub fn add_reviewer(&mut self, caller: &Address, reviewer: Address) -> Result<(), ReviewError> {
        self.access.grant_role(caller, Role::Reviewer, reviewer)?;
        Ok(())
    }

    pub fn remove_reviewer(&mut self, caller: &Address, reviewer: &Address) -> Result<(), ReviewError> {
        self.access.revoke_role(caller, Role::Reviewer, reviewer)?;
        Ok(())
    }

    pub fn is_reviewer(&self, who: &Address) -> bool {
        self.access.has_role(Role::Reviewer, who)
    }

    /// Record content for reviewers to look at. Open to anyone; grants no rights.
    pub fn submit_for_review(
        &mut self,
        submitter: Address,
        title: &str,
        calls: Vec<Call>,
        description: &str,
        metadata: &str,
        now: TimeIndex,
    ) -> Result<SubmissionId, ReviewError> {
        if calls.is_empty() {
            return Err(ReviewError::EmptySubmission);
        }
        let proposal =
            agora_crypto::hash_proposal(&calls, &agora_crypto::hash_description(description));
        let id = agora_crypto::submission_id(&submitter, &proposal, title, metadata);
        if self.submissions.contains_key(&id) {
            return Err(ReviewError::DuplicateSubmission(id));
        }
        self.submissions.insert(
            id,
            Submission {
                id,
                submitter,
                title: title.to_string(),
                calls,
                description: description.to_string(),
                metadata: metadata.to_string(),
                proposal,
                submitted_at: now,
            },
        );
        info!(submission = %id, %proposal, submitter = %submitter, title, "submitted for review");
        Ok(id)
    }

    pub fn submission(&self, id: &SubmissionId) -> Option<&Submission> {
        self.submissions.get(id)
    }

    /// All submissions whose content hashes to `proposal`.
    pub fn submissions_for(&self, proposal: &ProposalId) -> Vec<&Submission> {
        self.submissions
            .values()
            .filter(|s| s.proposal == *proposal)
            .collect()
    }

    /// Approve the exact content behind `proposal`. Reviewer-only.
    pub fn approve(
        &mut self,
        caller: &Address,
        proposal: ProposalId,
        now: TimeIndex,
    ) -> Result<(), ReviewError> {
        self.access.check_role(Role::Reviewer, caller)?;
        self.records.insert(
            proposal,
            ReviewRecord {
                proposal,
                approved: true,
                reviewer: *caller,
                updated_at: now,
            },
        );
        info!(%proposal, reviewer = %caller, "proposal approved");
        Ok(())
    }

    /// Withdraw an approval that has not been used yet. Reviewer-only.
    pub fn revoke_approval(
        &mut self,
        caller: &Address,
        proposal: &ProposalId,
        now: TimeIndex,
    ) -> Result<(), ReviewError> {
        self.access.check_role(Role::Reviewer, caller)?;
        let record = self
            .records
            .get_mut(proposal)
            .filter(|r| r.approved)
            .ok_or(ReviewError::NotApproved(*proposal))?;
        record.approved = false;
        record.reviewer = *caller;
        record.updated_at = now;
        info!(%proposal, reviewer = %caller, "approval revoked");
        Ok(())
    }

    pub fn record(&self, proposal: &ProposalId) -> Option<&ReviewRecord> {
        self.records.get(proposal)
    }
}

impl ProposalGate for ReviewGate {
    fn is_approved(&self, proposal: &ProposalId) -> bool {
        self.records.get(proposal).is_some_and(|r| r.approved)
    }
}
