//! Nullable call target: record invocations instead of acting on them.

use agora_types::{Address, CallError, CallTarget, TargetRegistry, TimeIndex};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedCall {
    pub caller: Address,
    pub value: u128,
    pub payload: Vec<u8>,
    pub at: TimeIndex,
}

/// A call target that records every invocation.
///
/// It can be told to revert, which it keeps doing until the failure is
/// cleared.
#[derive(Clone, Debug)]
pub struct NullTarget {
    address: Address,
    received: Vec<ReceivedCall>,
    failure: Option<String>,
}

impl NullTarget {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            received: Vec::new(),
            failure: None,
        }
    }

    /// Revert every following call with `reason`.
    pub fn fail_next(&mut self, reason: &str) {
        self.failure = Some(reason.to_string());
    }

    pub fn clear_failure(&mut self) {
        self.failure = None;
    }

    /// All calls accepted so far (for assertions).
    pub fn received(&self) -> &[ReceivedCall] {
        &self.received
    }
}

impl CallTarget for NullTarget {
    fn address(&self) -> Address {
        self.address
    }

    fn invoke(
        &mut self,
        caller: &Address,
        value: u128,
        payload: &[u8],
        now: TimeIndex,
    ) -> Result<(), CallError> {
        if let Some(reason) = &self.failure {
            return Err(CallError::Reverted(reason.clone()));
        }
        self.received.push(ReceivedCall {
            caller: *caller,
            value,
            payload: payload.to_vec(),
            at: now,
        });
        Ok(())
    }
}

impl TargetRegistry for NullTarget {
    fn target_mut(&mut self, address: &Address) -> Option<&mut dyn CallTarget> {
        if *address == self.address {
            Some(self)
        } else {
            None
        }
    }
}
