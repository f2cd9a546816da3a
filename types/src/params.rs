//! Deployment-time parameters for the governor and the timelock.
//!
//! Fixed when the system is deployed; changing them requires a redeploy.

use serde::{Deserialize, Serialize};

/// Denominator for basis-point fractions (10_000 = 100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Time units between proposal creation (the snapshot) and vote start.
    pub voting_delay: u64,

    /// Length of the voting window in time units.
    pub voting_period: u64,

    /// Quorum as a fraction of total supply at the snapshot (basis points).
    pub quorum_bps: u32,

    /// Minimum past voting power needed to create a proposal. Zero disables the check.
    pub proposal_threshold: u128,
}

impl GovernanceParams {
    /// Quorum for a given snapshot supply, rounded down.
    pub fn quorum_for(&self, total_supply: u128) -> u128 {
        total_supply.saturating_mul(self.quorum_bps as u128) / BPS_DENOMINATOR
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            voting_delay: 1,
            voting_period: 50_400,
            quorum_bps: 400,
            proposal_threshold: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockParams {
    /// Minimum delay between scheduling and execution.
    pub min_delay: u64,

    /// How long a ready operation stays executable before it expires.
    pub grace_period: u64,
}

impl Default for TimelockParams {
    fn default() -> Self {
        Self {
            min_delay: 172_800,
            grace_period: 1_209_600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_rounds_down() {
        let params = GovernanceParams {
            quorum_bps: 400,
            ..Default::default()
        };
        assert_eq!(params.quorum_for(10_000), 400);
        assert_eq!(params.quorum_for(99), 3);
        assert_eq!(params.quorum_for(0), 0);
    }

    #[test]
    fn quorum_saturates() {
        let params = GovernanceParams {
            quorum_bps: 10_000,
            ..Default::default()
        };
        assert_eq!(params.quorum_for(u128::MAX), u128::MAX / BPS_DENOMINATOR);
    }
}
