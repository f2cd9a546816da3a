//! Privileged call batches and the targets that receive them.

use crate::address::Address;
use crate::time::TimeIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One operation in a proposal batch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Call {
    pub target: Address,
    pub value: u128,
    pub payload: Vec<u8>,
}

impl Call {
    pub fn new(target: Address, value: u128, payload: Vec<u8>) -> Self {
        Self {
            target,
            value,
            payload,
        }
    }

    /// Zip parallel `targets` / `values` / `payloads` lists into a batch.
    pub fn batch_from_parts(
        targets: &[Address],
        values: &[u128],
        payloads: &[Vec<u8>],
    ) -> Result<Vec<Call>, CallError> {
        if targets.len() != values.len() || targets.len() != payloads.len() {
            return Err(CallError::LengthMismatch {
                targets: targets.len(),
                values: values.len(),
                payloads: payloads.len(),
            });
        }
        Ok(targets
            .iter()
            .zip(values)
            .zip(payloads)
            .map(|((target, value), payload)| Call::new(*target, *value, payload.clone()))
            .collect())
    }
}

/// Failure of a single call inside a batch.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CallError {
    #[error("no call target registered at {0}")]
    UnknownTarget(Address),

    #[error("target does not accept value transfers")]
    NotPayable,

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("call reverted: {0}")]
    Reverted(String),

    #[error("length mismatch: {targets} targets, {values} values, {payloads} payloads")]
    LengthMismatch {
        targets: usize,
        values: usize,
        payloads: usize,
    },
}

/// A component that can receive privileged calls from the timelock.
pub trait CallTarget {
    /// The address calls must name to reach this target.
    fn address(&self) -> Address;

    /// Apply one call. `caller` is the identity performing the call (the
    /// timelock when executing a governance batch).
    fn invoke(
        &mut self,
        caller: &Address,
        value: u128,
        payload: &[u8],
        now: TimeIndex,
    ) -> Result<(), CallError>;
}

/// Address-based lookup of call targets for batch execution.
pub trait TargetRegistry {
    fn target_mut(&mut self, address: &Address) -> Option<&mut dyn CallTarget>;
}
