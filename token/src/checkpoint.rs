//! Append-only voting power history.

use agora_types::TimeIndex;
use serde::{Deserialize, Serialize};

/// Voting power recorded at a time index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub at: TimeIndex,
    pub votes: u128,
}

/// Ordered checkpoints for one delegatee (or for total supply).
///
/// Entries are strictly increasing in `at`. Writes at the same index as the
/// newest entry overwrite it, so the history holds at most one entry per
/// distinct time index. Entries older than the newest are never touched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHistory {
    entries: Vec<Checkpoint>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent value, zero if empty.
    pub fn latest(&self) -> u128 {
        self.entries.last().map(|c| c.votes).unwrap_or(0)
    }

    /// Time index of the newest entry.
    pub fn latest_at(&self) -> Option<TimeIndex> {
        self.entries.last().map(|c| c.at)
    }

    /// Value of the latest entry at or before `at` (binary search), zero if none.
    pub fn upper_lookup(&self, at: TimeIndex) -> u128 {
        let idx = self.entries.partition_point(|c| c.at <= at);
        if idx == 0 {
            0
        } else {
            self.entries[idx - 1].votes
        }
    }

    /// Record `votes` at `at`. The caller guarantees `at` is not older than
    /// the newest entry.
    pub(crate) fn push(&mut self, at: TimeIndex, votes: u128) {
        match self.entries.last_mut() {
            Some(last) if last.at == at => last.votes = votes,
            _ => {
                debug_assert!(self.latest_at().map_or(true, |last| last < at));
                self.entries.push(Checkpoint { at, votes });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&Checkpoint> {
        self.entries.get(pos)
    }
}
