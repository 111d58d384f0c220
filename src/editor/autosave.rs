//! editor::autosave
//!
//! Debounced draft persistence.
//!
//! Every [`schedule`](AutosaveScheduler::schedule) aborts the pending timer
//! and starts a new one, so only the snapshot that survives a full quiet
//! period is written. Dropping the scheduler aborts the pending timer; no
//! write happens after the editing session is gone.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::drafts::{DraftKey, DraftService};

/// Debounces draft saves for one entity.
pub struct AutosaveScheduler {
    drafts: DraftService,
    key: DraftKey,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    last_autosaved_at: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl std::fmt::Debug for AutosaveScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveScheduler")
            .field("key", &self.key)
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl AutosaveScheduler {
    pub fn new(drafts: DraftService, key: DraftKey, delay: Duration) -> Self {
        Self {
            drafts,
            key,
            delay,
            pending: None,
            last_autosaved_at: Arc::new(Mutex::new(None)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Persist `{base, modified}` after the delay unless superseded.
    ///
    /// Outside a Tokio runtime there is no timer to debounce with, so the
    /// draft is written immediately.
    pub fn schedule(&mut self, base: Value, modified: Value) {
        self.cancel();

        let drafts = self.drafts.clone();
        let key = self.key.clone();
        let delay = self.delay;
        let last = self.last_autosaved_at.clone();

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                save(&drafts, &key, &base, &modified, &last);
                return;
            }
        };

        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            save(&drafts, &key, &base, &modified, &last);
        }));
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                debug!(draft = %self.key, "pending autosave cancelled");
            }
            pending.abort();
        }
    }

    /// Whether a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    /// When the last autosave was written.
    pub fn last_autosaved_at(&self) -> Option<DateTime<Utc>> {
        *lock(&self.last_autosaved_at)
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(slot: &Mutex<Option<DateTime<Utc>>>) -> MutexGuard<'_, Option<DateTime<Utc>>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn save(
    drafts: &DraftService,
    key: &DraftKey,
    base: &Value,
    modified: &Value,
    last: &Mutex<Option<DateTime<Utc>>>,
) {
    match drafts.save_draft(key, base, modified) {
        Ok(saved_at) => {
            *lock(last) = Some(saved_at);
            debug!(draft = %key, "autosaved");
        }
        Err(e) => warn!(draft = %key, error = %e, "autosave failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use serde_json::json;

    const DELAY: Duration = Duration::from_millis(2000);

    fn scheduler() -> (DraftService, AutosaveScheduler) {
        let drafts = DraftService::new(Arc::new(MemoryKvStore::new()));
        let scheduler = AutosaveScheduler::new(drafts.clone(), DraftKey::from("p1"), DELAY);
        (drafts, scheduler)
    }

    #[tokio::test(start_paused = true)]
    async fn saves_after_quiet_period() {
        let (drafts, mut scheduler) = scheduler();
        scheduler.schedule(json!({}), json!({"v": 1}));

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert!(drafts.load_draft(&DraftKey::from("p1")).is_none());
        assert!(scheduler.is_pending());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let draft = drafts.load_draft(&DraftKey::from("p1")).expect("draft");
        assert_eq!(draft.modified, json!({"v": 1}));
        assert!(scheduler.last_autosaved_at().is_some());
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn new_edits_restart_the_timer() {
        let (drafts, mut scheduler) = scheduler();
        scheduler.schedule(json!({}), json!({"v": 1}));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        scheduler.schedule(json!({}), json!({"v": 2}));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(drafts.load_draft(&DraftKey::from("p1")).is_none());

        tokio::time::sleep(Duration::from_millis(600)).await;
        let draft = drafts.load_draft(&DraftKey::from("p1")).expect("draft");
        assert_eq!(draft.modified, json!({"v": 2}));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_prevent_the_write() {
        let (drafts, mut scheduler) = scheduler();
        scheduler.schedule(json!({}), json!({"v": 1}));
        scheduler.cancel();
        assert!(!scheduler.is_pending());

        scheduler.schedule(json!({}), json!({"v": 2}));
        drop(scheduler);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(drafts.load_draft(&DraftKey::from("p1")).is_none());
    }

    #[test]
    fn writes_immediately_without_runtime() {
        let (drafts, mut scheduler) = scheduler();
        scheduler.schedule(json!({}), json!({"v": 1}));

        assert!(drafts.load_draft(&DraftKey::from("p1")).is_some());
        assert!(!scheduler.is_pending());
    }
}
