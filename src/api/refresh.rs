//! api::refresh
//!
//! Single-flight coordination of credential refreshes.
//!
//! # Concurrency
//!
//! At most one refresh runs at a time. The in-flight marker is a shared
//! future stored under a mutex before anyone polls it, so a second caller
//! that arrives while the first is still waiting on the network finds the
//! marker and awaits the same result instead of starting its own refresh.
//!
//! Each attempt carries an id. Whoever finishes awaiting clears the marker
//! only if it still holds that id, so a stale caller never clears a newer
//! attempt.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};

use super::errors::RefreshFailure;

type RefreshFuture = Shared<BoxFuture<'static, Result<(), RefreshFailure>>>;

struct InFlight {
    id: u64,
    future: RefreshFuture,
}

/// Shares one refresh attempt between all concurrent callers.
#[derive(Default)]
pub(crate) struct RefreshCoordinator {
    in_flight: Mutex<Option<InFlight>>,
    next_id: AtomicU64,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Await the in-flight refresh, starting one with `start` if none is
    /// running.
    ///
    /// `start` is called at most once per attempt, and only by the caller
    /// that establishes the marker. Side effects of the refresh belong inside
    /// the future it returns, so they run once however many callers wait.
    pub(crate) async fn run<F>(&self, start: F) -> Result<(), RefreshFailure>
    where
        F: FnOnce() -> BoxFuture<'static, Result<(), RefreshFailure>>,
    {
        let (id, future) = {
            let mut slot = self.slot();
            match slot.as_ref() {
                Some(in_flight) => {
                    tracing::debug!(attempt = in_flight.id, "joining in-flight refresh");
                    (in_flight.id, in_flight.future.clone())
                }
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let future = start().shared();
                    *slot = Some(InFlight {
                        id,
                        future: future.clone(),
                    });
                    (id, future)
                }
            }
        };

        let result = future.await;

        let mut slot = self.slot();
        if slot.as_ref().map(|in_flight| in_flight.id) == Some(id) {
            *slot = None;
        }
        result
    }

    #[cfg(test)]
    fn is_idle(&self) -> bool {
        self.slot().is_none()
    }
}
