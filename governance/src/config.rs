//! DAO deployment configuration.
//!
//! Loaded from a TOML file via [`DaoConfig::from_toml_file`] or built in
//! code. Every field has a default, so an empty file is a valid config.
//! The values are fixed once the DAO is deployed.

use crate::error::ConfigError;
use agora_types::{GovernanceParams, TimelockParams, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Token display name.
    #[serde(default = "default_token_name")]
    pub token_name: String,

    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,

    /// Units minted to the deployer at deployment.
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u64,

    /// Time indices between proposal creation and vote start. At least 1.
    #[serde(default = "default_voting_delay")]
    pub voting_delay: u64,

    #[serde(default = "default_voting_period")]
    pub voting_period: u64,

    /// Quorum in basis points of the snapshot supply.
    #[serde(default = "default_quorum_bps")]
    pub quorum_bps: u32,

    /// Past votes a proposer needs. 0 disables the check.
    #[serde(default)]
    pub proposal_threshold: u64,

    #[serde(default = "default_timelock_min_delay")]
    pub timelock_min_delay: u64,

    /// How long a ready operation stays executable.
    #[serde(default = "default_timelock_grace_period")]
    pub timelock_grace_period: u64,

    /// Require reviewer approval before a proposal can be created.
    #[serde(default = "default_true")]
    pub require_review: bool,

    /// Grant the executor role to everyone.
    #[serde(default = "default_true")]
    pub open_execution: bool,

    /// Drop the deployer's bootstrap admin rights once wiring is done.
    #[serde(default = "default_true")]
    pub renounce_deployer_admin: bool,
}

fn default_token_name() -> String {
    "MyToken".to_string()
}

fn default_token_symbol() -> String {
    "MTK".to_string()
}

fn default_initial_supply() -> u64 {
    10_000
}

fn default_voting_delay() -> u64 {
    1
}

fn default_voting_period() -> u64 {
    50_400
}

fn default_quorum_bps() -> u32 {
    400
}

fn default_timelock_min_delay() -> u64 {
    10
}

fn default_timelock_grace_period() -> u64 {
    1_209_600
}

fn default_true() -> bool {
    true
}

impl DaoConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.voting_delay < 1 {
            return Err(ConfigError::Invalid(
                "voting_delay must be at least 1 so the snapshot is in the past when voting opens"
                    .into(),
            ));
        }
        if self.voting_period < 1 {
            return Err(ConfigError::Invalid("voting_period must be at least 1".into()));
        }
        if self.quorum_bps as u128 > BPS_DENOMINATOR {
            return Err(ConfigError::Invalid(format!(
                "quorum_bps {} exceeds {BPS_DENOMINATOR}",
                self.quorum_bps
            )));
        }
        if self.timelock_grace_period < 1 {
            return Err(ConfigError::Invalid(
                "timelock_grace_period must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn governance_params(&self) -> GovernanceParams {
        GovernanceParams {
            voting_delay: self.voting_delay,
            voting_period: self.voting_period,
            quorum_bps: self.quorum_bps,
            proposal_threshold: self.proposal_threshold as u128,
        }
    }

    pub fn timelock_params(&self) -> TimelockParams {
        TimelockParams {
            min_delay: self.timelock_min_delay,
            grace_period: self.timelock_grace_period,
        }
    }
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            token_name: default_token_name(),
            token_symbol: default_token_symbol(),
            initial_supply: default_initial_supply(),
            voting_delay: default_voting_delay(),
            voting_period: default_voting_period(),
            quorum_bps: default_quorum_bps(),
            proposal_threshold: 0,
            timelock_min_delay: default_timelock_min_delay(),
            timelock_grace_period: default_timelock_grace_period(),
            require_review: default_true(),
            open_execution: default_true(),
            renounce_deployer_admin: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaoConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert_eq!(DaoConfig::from_toml_str(&toml_str).unwrap(), config);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = DaoConfig::from_toml_str("").unwrap();
        assert_eq!(config, DaoConfig::default());
        assert_eq!(config.timelock_min_delay, 10);
        assert!(config.require_review);
    }

    #[test]
    fn partial_toml_overrides() {
        let config = DaoConfig::from_toml_str(
            r#"
            voting_period = 5
            quorum_bps = 1000
            require_review = false
        "#,
        )
        .unwrap();
        assert_eq!(config.voting_period, 5);
        assert_eq!(config.governance_params().quorum_bps, 1000);
        assert!(!config.require_review);
        assert_eq!(config.voting_delay, 1);
    }

    #[test]
    fn zero_voting_delay_rejected() {
        assert!(matches!(
            DaoConfig::from_toml_str("voting_delay = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn quorum_above_whole_rejected() {
        let config = DaoConfig {
            quorum_bps: 10_001,
            ..DaoConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_returns_io_error() {
        assert!(matches!(
            DaoConfig::from_toml_file("/nonexistent/agora.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agora.toml");
        std::fs::write(&path, "timelock_min_delay = 42\n").unwrap();
        let config = DaoConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.timelock_params().min_delay, 42);
    }
}
