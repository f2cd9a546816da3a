use agora_access::AccessError;
use agora_types::{ProposalId, SubmissionId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AccessError),

    #[error("proposal {0} has no approval to revoke")]
    NotApproved(ProposalId),

    #[error("submission {0} already recorded")]
    DuplicateSubmission(SubmissionId),

    #[error("a submission must contain at least one call")]
    EmptySubmission,
}
