//! drafts::service
//!
//! Draft persistence over a [`KvStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::entry::{DraftEntry, DraftKey, KEY_PREFIX};
use super::DraftError;
use crate::storage::KvStore;

/// Saves, loads and clears drafts.
///
/// Every save overwrites the whole entry for its key. Reads never fail:
/// an entry that cannot be read or parsed is reported as absent.
#[derive(Clone)]
pub struct DraftService {
    store: Arc<dyn KvStore>,
}

impl std::fmt::Debug for DraftService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftService").finish_non_exhaustive()
    }
}

impl DraftService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Overwrite the draft for `key` with `{base, modified, savedAt: now}`.
    ///
    /// Returns the timestamp that was written.
    pub fn save_draft(
        &self,
        key: &DraftKey,
        base: &Value,
        modified: &Value,
    ) -> Result<DateTime<Utc>, DraftError> {
        let entry = DraftEntry::new(base.clone(), modified.clone(), Utc::now());
        let raw = serde_json::to_string(&entry).map_err(DraftError::Serialize)?;
        self.store.set(&key.storage_key(), &raw)?;
        debug!(draft = %key, "draft saved");
        Ok(entry.saved_at)
    }

    /// The stored draft for `key`, or `None` if absent or unreadable.
    pub fn load_draft(&self, key: &DraftKey) -> Option<DraftEntry> {
        let raw = match self.store.get(&key.storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(draft = %key, error = %e, "draft store read failed");
                return None;
            }
        };
        let entry = DraftEntry::parse(&raw);
        if entry.is_none() {
            warn!(draft = %key, "ignoring corrupted draft");
        }
        entry
    }

    /// Whether anything is stored for `key`.
    ///
    /// This checks raw presence: a corrupted entry still counts, so a caller
    /// that offers restoration must go through [`load_draft`](Self::load_draft).
    pub fn has_draft(&self, key: &DraftKey) -> bool {
        match self.store.exists(&key.storage_key()) {
            Ok(present) => present,
            Err(e) => {
                warn!(draft = %key, error = %e, "draft store read failed");
                false
            }
        }
    }

    /// Remove the draft for `key`. Succeeds when there is none.
    pub fn clear_draft(&self, key: &DraftKey) -> Result<(), DraftError> {
        self.store.delete(&key.storage_key())?;
        debug!(draft = %key, "draft cleared");
        Ok(())
    }

    /// Every readable draft, ordered by key. Corrupted entries are skipped.
    pub fn list_drafts(&self) -> Result<Vec<(DraftKey, DraftEntry)>, DraftError> {
        let keys = self.store.keys_with_prefix(KEY_PREFIX)?;
        Ok(keys
            .iter()
            .filter_map(|storage_key| DraftKey::from_storage_key(storage_key))
            .filter_map(|key| self.load_draft(&key).map(|entry| (key, entry)))
            .collect())
    }
}
