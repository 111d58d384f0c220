//! editor
//!
//! Editing-session coordination on top of drafts and the merge engine.
//!
//! # Architecture
//!
//! - [`EditorSession`]: draft-restore offer, dirty tracking, conflict
//!   detection and resolution for one entity
//! - [`AutosaveScheduler`]: debounced draft writes, cancelled on teardown
//! - [`SchemaValidator`]: host-supplied validation of restored drafts
//! - [`EntityLoader`]: source of fresh server snapshots
//! - [`events`]: which server file changes make an open entity stale
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use spedit::drafts::{DraftKey, DraftService};
//! use spedit::editor::{EditorSession, EditorState, RequireObject, ServerObservation};
//! use spedit::storage::MemoryKvStore;
//!
//! let drafts = DraftService::new(Arc::new(MemoryKvStore::new()));
//! let server = json!({"id": "p1", "playlists": []});
//! let mut session = EditorSession::open(DraftKey::from("p1"), Some(server), drafts, RequireObject);
//!
//! session.update(|config| config["displayName"] = json!("Mine")).unwrap();
//! assert_eq!(session.state(), EditorState::Dirty);
//!
//! let upstream = json!({"id": "p1", "playlists": [{"id": "a"}]});
//! assert!(matches!(session.observe_server(upstream), ServerObservation::Conflict(_)));
//! ```

mod autosave;
mod conflict;
pub mod events;
mod session;
mod validate;

pub use autosave::AutosaveScheduler;
pub use conflict::{ConflictRecord, ConflictResolution, ServerObservation};
pub use events::{invalidation_for, ChangeKind, FileChange, Invalidation};
pub use session::{default_config, EditorSession, EditorState};
pub use validate::{AcceptAll, RequireObject, SchemaValidator};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::api::ApiError;
use crate::drafts::DraftError;

/// Errors from editing-session operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A stored draft must be restored or discarded before editing.
    #[error("a stored draft must be restored or discarded first")]
    DraftDecisionPending,

    #[error("there is no stored draft to restore or discard")]
    NoPendingDraft,

    #[error("there is no conflict to resolve")]
    NoConflict,

    /// The validator rejected a value. Any stored draft is kept.
    #[error("invalid config: {0}")]
    Validation(String),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("cannot load server version: {0}")]
    Load(#[from] ApiError),
}

/// Fetches the current server snapshot of an entity.
#[async_trait]
pub trait EntityLoader: Send + Sync {
    async fn load(&self, id: &str) -> Result<Value, ApiError>;
}
