//! Token-specific errors.

use agora_types::{Address, TimeIndex};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("{caller} does not hold the governor capability")]
    Unauthorized { caller: Address },

    #[error("time index {requested} is not in the past (now {now})")]
    InvalidTimeIndex { requested: TimeIndex, now: TimeIndex },

    #[error("time index went backwards: last write at {last}, now {now}")]
    TimeRegression { last: TimeIndex, now: TimeIndex },

    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("cannot mint or transfer to the wildcard identity")]
    ZeroAddress,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in token accounting")]
    Overflow,
}
