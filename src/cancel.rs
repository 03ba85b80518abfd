//! Cooperative cancellation for the prompt phase.
//!
//! One token is created per [`crate::Wizard::prompt`] run and installed on
//! the context for its duration. The engine checks it at the top of each loop
//! iteration and before sub-wizard expansion, and races the in-flight input
//! call against it, so cancellation latency is bounded by one step's
//! remaining work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Clonable cancellation flag with an async wait.
///
/// All clones share the same flag; cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake all waiters.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once cancellation has been requested.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            // Re-check after registering the waiter: notify_waiters only
            // wakes tasks that are already registered.
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
