use agora_access::AccessError;
use agora_types::{CallError, OperationId, TimeIndex};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelockError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AccessError),

    #[error("delay {delay} is below the minimum delay {minimum}")]
    InsufficientDelay { delay: u64, minimum: u64 },

    #[error("operation {0} is already scheduled")]
    AlreadyScheduled(OperationId),

    #[error("operation {0} was already executed")]
    AlreadyExecuted(OperationId),

    #[error("operation {id} is not ready until {ready_at} (now {now})")]
    NotReady {
        id: OperationId,
        ready_at: TimeIndex,
        now: TimeIndex,
    },

    #[error("operation {id} expired at {expired_at}")]
    Expired { id: OperationId, expired_at: TimeIndex },

    #[error("operation {0} is not scheduled")]
    UnknownOperation(OperationId),

    #[error("operation {0} is not pending")]
    NotPending(OperationId),

    #[error("predecessor operation {0} has not been executed")]
    MissingDependency(OperationId),

    #[error("call {index} failed: {source}")]
    CallFailed {
        index: usize,
        #[source]
        source: CallError,
    },

    #[error("a batch must contain at least one call")]
    EmptyBatch,

    #[error("ready time overflows the time index")]
    Overflow,
}
