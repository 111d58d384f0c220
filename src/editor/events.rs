//! editor::events
//!
//! Routing of server file-change notifications.
//!
//! The config server announces changes to its pattern files as
//! `{"type": "created" | "modified" | "deleted", "path": "..."}`. Only some
//! paths matter to an editor:
//!
//! | Path | Invalidates |
//! | --- | --- |
//! | `patterns/meta.json` | the pattern list |
//! | `patterns/<id>/meta.json` | the assembled config of `<id>` |
//! | `patterns/<id>/playlists/<file>.json` | the assembled config of `<id>` |
//!
//! A session whose entity is affected refetches it and passes the result to
//! [`EditorSession::observe_server`](super::EditorSession::observe_server).

use serde::{Deserialize, Serialize};

/// What happened to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

/// One change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Path relative to the server's config root.
    pub path: String,
}

impl FileChange {
    /// Parse the data of one event.
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// Cached data made stale by a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    PatternList,
    AssembledConfig(String),
}

impl Invalidation {
    /// Whether an editor open on `entity_id` must refetch.
    pub fn affects(&self, entity_id: &str) -> bool {
        matches!(self, Self::AssembledConfig(id) if id == entity_id)
    }
}

/// Map a change to what it invalidates, if anything.
pub fn invalidation_for(change: &FileChange) -> Option<Invalidation> {
    let parts: Vec<&str> = change.path.split('/').collect();
    match parts.as_slice() {
        ["patterns", "meta.json"] => Some(Invalidation::PatternList),
        ["patterns", id, "meta.json"] if !id.is_empty() => {
            Some(Invalidation::AssembledConfig(id.to_string()))
        }
        ["patterns", id, "playlists", file] if !id.is_empty() && is_json_file(file) => {
            Some(Invalidation::AssembledConfig(id.to_string()))
        }
        _ => None,
    }
}

fn is_json_file(name: &str) -> bool {
    name.strip_suffix(".json").is_some_and(|stem| !stem.is_empty())
}
