//! Persisted CLI session: the deployed DAO plus the current time index.

use agora_governance::Dao;
use agora_types::{Address, TimeIndex};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct StateFile {
    now: TimeIndex,
    dao: Vec<u8>,
}

pub struct Session {
    pub now: TimeIndex,
    pub dao: Dao,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| {
            format!(
                "cannot read state file {} (run `agora init` first)",
                path.display()
            )
        })?;
        let file: StateFile = bincode::deserialize(&bytes)
            .with_context(|| format!("state file {} is corrupt", path.display()))?;
        let dao = Dao::load_state(&file.dao).context("cannot restore DAO state")?;
        Ok(Self { now: file.now, dao })
    }

    /// Write atomically: a temp file next to `path` is renamed over it.
    pub fn store(&self, path: &Path) -> Result<()> {
        let file = StateFile {
            now: self.now,
            dao: self.dao.save_state()?,
        };
        let bytes = bincode::serialize(&file)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, bytes)
            .with_context(|| format!("cannot write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("cannot replace {}", path.display()))?;
        debug!(path = %path.display(), now = %self.now, "state saved");
        Ok(())
    }
}

/// `0x`-prefixed 40-digit hex is taken as an address; anything else is a
/// label hashed to one.
pub fn parse_identity(s: &str) -> Result<Address> {
    let s = s.trim();
    if s.is_empty() {
        bail!("empty identity");
    }
    if s.starts_with("0x") {
        return Address::from_hex(s).with_context(|| format!("invalid address {s}"));
    }
    Ok(Address::from_label(s))
}
