//! Single-flight lock serializing every account write.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("another account write is already in flight")]
pub struct GuardBusy;

/// Global write lock for the controller. Not per-record: at most one create,
/// update or delete is in flight at any time.
#[derive(Debug, Default)]
pub struct MutationGuard {
    held: Arc<AtomicBool>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<MutationPermit, GuardBusy> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GuardBusy)?;
        Ok(MutationPermit {
            held: Arc::clone(&self.held),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of acquisition. The guard is released when the permit drops, so
/// every exit path of a guarded operation frees it.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the permit is dropped"]
pub struct MutationPermit {
    held: Arc<AtomicBool>,
}

impl MutationPermit {
    pub fn release(self) {}
}

impl Drop for MutationPermit {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "tests/guard_tests.rs"]
mod tests;
