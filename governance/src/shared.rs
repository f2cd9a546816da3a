//! Serialized access to a DAO shared across threads.

use crate::dao::Dao;
use std::sync::{Arc, Mutex, PoisonError};

/// Every operation runs under one lock, so no caller observes a partially
/// applied transition and check-and-set steps like double-vote detection
/// cannot interleave.
#[derive(Clone, Debug)]
pub struct SharedDao {
    inner: Arc<Mutex<Dao>>,
}

impl SharedDao {
    pub fn new(dao: Dao) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dao)),
        }
    }

    /// Run `f` with exclusive access to the DAO.
    pub fn with<T>(&self, f: impl FnOnce(&mut Dao) -> T) -> T {
        // a panic inside `f` cannot leave a half-applied transition: every
        // operation validates before it mutates
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Dao {
        self.with(|dao| dao.clone())
    }
}
