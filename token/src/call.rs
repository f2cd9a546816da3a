//! Payload codec for calls the timelock makes into the token.

use crate::token::VotingToken;
use agora_types::{Address, CallError, CallTarget, TargetRegistry, TimeIndex};
use serde::{Deserialize, Serialize};

/// Privileged token operations reachable through a governance batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCall {
    Mint { to: Address, amount: u128 },
    SetGovernor { governor: Address },
}

impl TokenCall {
    /// Encode as a call payload.
    pub fn encode(&self) -> Result<Vec<u8>, CallError> {
        bincode::serialize(self).map_err(|e| CallError::Malformed(e.to_string()))
    }

    pub fn decode(payload: &[u8]) -> Result<Self, CallError> {
        bincode::deserialize(payload).map_err(|e| CallError::Malformed(e.to_string()))
    }
}

impl CallTarget for VotingToken {
    fn address(&self) -> Address {
        VotingToken::address(self)
    }

    fn invoke(
        &mut self,
        caller: &Address,
        value: u128,
        payload: &[u8],
        now: TimeIndex,
    ) -> Result<(), CallError> {
        if value != 0 {
            return Err(CallError::NotPayable);
        }
        let result = match TokenCall::decode(payload)? {
            TokenCall::Mint { to, amount } => self.mint(caller, to, amount, now),
            TokenCall::SetGovernor { governor } => self.set_governor(caller, governor),
        };
        result.map_err(|e| CallError::Reverted(e.to_string()))
    }
}

impl TargetRegistry for VotingToken {
    fn target_mut(&mut self, address: &Address) -> Option<&mut dyn CallTarget> {
        if *address == VotingToken::address(self) {
            Some(self)
        } else {
            None
        }
    }
}
