//! Nullable clock: deterministic time indices for testing.

use agora_types::TimeIndex;
use std::cell::Cell;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
#[derive(Debug, Default)]
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial: u64) -> Self {
        Self {
            current: Cell::new(initial),
        }
    }

    pub fn now(&self) -> TimeIndex {
        TimeIndex::new(self.current.get())
    }

    /// Advance by `by` indices and return the new time.
    pub fn advance(&self, by: u64) -> TimeIndex {
        self.current.set(self.current.get().saturating_add(by));
        self.now()
    }

    /// Jump to a specific index and return it.
    pub fn set(&self, index: u64) -> TimeIndex {
        self.current.set(index);
        self.now()
    }
}
