//! Debounced task scheduling.
//!
//! Mirrors the frontend's search-box behaviour: every call to
//! [`Debouncer::schedule`] cancels whatever is still pending and schedules
//! the new task after the quiet period. Only the latest task of a burst runs.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Quiet period used by the catalog search box.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Cancels and reschedules tasks so only the last one in a burst fires.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Mutex::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Schedule `task` to run after the quiet period, cancelling any task
    /// still waiting. The handle resolves to `true` if the task ran and
    /// `false` if it was superseded or cancelled first.
    pub fn schedule<F>(&self, task: F) -> JoinHandle<bool>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.swap_pending(Some(token.clone())) {
            previous.cancel();
        }

        let quiet = self.quiet;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(quiet) => {
                    task.await;
                    true
                }
            }
        })
    }

    /// Cancel the pending task, if any, without scheduling a new one.
    pub fn cancel(&self) {
        if let Some(previous) = self.swap_pending(None) {
            previous.cancel();
        }
    }

    fn swap_pending(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *pending, next)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
