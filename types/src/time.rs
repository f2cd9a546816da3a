//! Time index used throughout the engine.
//!
//! A time index is a monotonically increasing counter supplied by the
//! caller (a block height or a Unix second, depending on the host). The
//! engine never reads a wall clock itself; every operation takes `now`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeIndex(u64);

impl TimeIndex {
    pub const ZERO: Self = Self(0);

    pub fn new(index: u64) -> Self {
        Self(index)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    pub fn checked_add(self, delta: u64) -> Option<Self> {
        self.0.checked_add(delta).map(Self)
    }

    /// The previous index, or `None` at zero.
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// Units remaining until `target`, zero if already reached.
    pub fn until(self, target: TimeIndex) -> u64 {
        target.0.saturating_sub(self.0)
    }
}

impl fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl From<u64> for TimeIndex {
    fn from(index: u64) -> Self {
        Self(index)
    }
}
