//! drafts
//!
//! Local persistence of unsaved edits.
//!
//! A draft is a `(base, modified)` pair: the state editing started from and
//! the user's working state. Drafts are stored one per entity under
//! `autosave:<id>`, or `autosave:__new__` for an entity that has not been
//! saved yet, and are overwritten whole on every save.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use spedit::drafts::{DraftKey, DraftService};
//! use spedit::storage::MemoryKvStore;
//!
//! let drafts = DraftService::new(Arc::new(MemoryKvStore::new()));
//! let key = DraftKey::from("p1");
//!
//! drafts.save_draft(&key, &json!({"id": "p1"}), &json!({"id": "p1", "x": 1})).unwrap();
//! assert_eq!(drafts.load_draft(&key).unwrap().modified["x"], 1);
//!
//! drafts.clear_draft(&key).unwrap();
//! assert!(drafts.load_draft(&key).is_none());
//! ```

mod entry;
mod service;

pub use entry::{DraftEntry, DraftKey, KEY_PREFIX, NEW_ENTITY_SENTINEL};
pub use service::DraftService;

use thiserror::Error;

use crate::storage::StoreError;

/// Errors from writing or clearing drafts.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("cannot serialize draft: {0}")]
    Serialize(#[source] serde_json::Error),
}
