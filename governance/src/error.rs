use agora_access::AccessError;
use agora_review::ReviewError;
use agora_timelock::TimelockError;
use agora_token::TokenError;
use agora_types::{Address, CallError, ProposalId, ProposalState, TimeIndex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    UnknownProposal(ProposalId),

    #[error("proposal {proposal} is {actual}; the operation is not allowed in this state")]
    InvalidState {
        proposal: ProposalId,
        actual: ProposalState,
    },


    #[error("proposal {0} has not been approved by a reviewer")]
    NotApproved(ProposalId),

    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted { voter: Address, proposal: ProposalId },

    #[error("proposal {0} was already executed")]
    AlreadyExecuted(ProposalId),

    #[error("time index {now} is before the last accepted index {last}")]
    TimeRegression { now: TimeIndex, last: TimeIndex },

    #[error("invalid governance parameters: {0}")]
    InvalidParams(&'static str),

    #[error("a proposal must contain at least one call")]
    EmptyProposal,

    #[error("proposer votes below threshold: have {votes}, need {threshold}")]
    BelowThreshold { votes: u128, threshold: u128 },

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AccessError),

    #[error("token: {0}")]
    Token(#[from] TokenError),

    #[error("timelock: {0}")]
    Timelock(#[from] TimelockError),

    #[error("review: {0}")]
    Review(#[from] ReviewError),

    #[error("call: {0}")]
    Call(#[from] CallError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("state snapshot: {0}")]
    Snapshot(#[from] bincode::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
