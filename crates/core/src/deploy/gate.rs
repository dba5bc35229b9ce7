//! Single-flight gate for deploys.
//!
//! Overlapping `git pull` / restart sequences race on the working tree, so
//! only one deploy may run at a time. A second trigger while one is running
//! is rejected immediately; nothing is queued.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::CoreError;

/// Cheaply cloneable handle to the shared deploy lock.
#[derive(Debug, Clone, Default)]
pub struct DeployGate {
    lock: Arc<Mutex<()>>,
}

/// Held for the duration of one deploy. Dropping it reopens the gate.
#[derive(Debug)]
pub struct DeployPermit {
    _guard: OwnedMutexGuard<()>,
}

impl DeployGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate without waiting. [`CoreError::Conflict`] if a deploy
    /// is in progress.
    pub fn try_acquire(&self) -> Result<DeployPermit, CoreError> {
        Arc::clone(&self.lock)
            .try_lock_owned()
            .map(|guard| DeployPermit { _guard: guard })
            .map_err(|_| CoreError::Conflict("Deploy already in progress".into()))
    }

    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
