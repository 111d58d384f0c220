//! editor::conflict
//!
//! Outcomes of comparing a fresh server snapshot with the session.

use serde_json::Value;

/// The server changed an entity while local edits were outstanding.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictRecord {
    /// Id of the affected entity, `None` for an unsaved one.
    pub entity: Option<String>,
    /// The server snapshot that caused the conflict.
    pub server: Value,
}

/// How the user settles a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Drop local edits and adopt the server version.
    ReloadFromServer,
    /// Keep local edits; treat the server version as seen.
    KeepLocal,
}

/// Result of [`EditorSession::observe_server`](super::EditorSession::observe_server).
#[derive(Debug, Clone, PartialEq)]
pub enum ServerObservation {
    /// The snapshot matches what the session last loaded or saved.
    Unchanged,
    /// The session was clean and now holds the new snapshot.
    Reloaded,
    /// The session is dirty; a conflict was recorded.
    Conflict(ConflictRecord),
}
