//! editor::session
//!
//! One editing session over one entity.
//!
//! # State machine
//!
//! ```text
//! open ──(stored draft)──> AwaitingDraftDecision ──restore/discard──┐
//!   │                                                              │
//!   └──────────────────────────> Clean <───────────────────────────┘
//!                                 │ edit           ^ mark_saved / reload
//!                                 v                │
//!                               Dirty ──(server diverged)──> Conflicted
//!                                 ^                              │
//!                                 └──────── keep local ──────────┘
//! ```
//!
//! Dirty tracking compares the working state with an independent deep copy
//! of the last loaded or saved snapshot, never with a shared reference.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::autosave::AutosaveScheduler;
use super::conflict::{ConflictRecord, ConflictResolution, ServerObservation};
use super::validate::SchemaValidator;
use super::{EditorError, EntityLoader};
use crate::core::json::deep_equals;
use crate::drafts::{DraftEntry, DraftKey, DraftService};
use crate::merge::{merge, sanitize};

/// Initial state for an entity the server has never seen.
pub fn default_config() -> Value {
    json!({"id": "", "playlists": [], "yearGroupedEpisodes": false})
}

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// A stored draft was found; edits wait until it is restored or discarded.
    AwaitingDraftDecision,
    Clean,
    Dirty,
    /// Dirty, and the server changed underneath.
    Conflicted,
}

/// Coordinates drafts, dirty tracking and conflicts for one entity.
pub struct EditorSession {
    key: DraftKey,
    drafts: DraftService,
    validator: Box<dyn SchemaValidator>,
    /// User's working state.
    working: Value,
    /// Deep copy of the last loaded or saved state.
    remembered: Value,
    /// Base written into drafts.
    base: Value,
    /// Latest server version seen, if the entity exists there.
    server: Option<Value>,
    pending_draft: Option<DraftEntry>,
    conflict: Option<ConflictRecord>,
    autosave: Option<AutosaveScheduler>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("key", &self.key)
            .field("state", &self.state())
            .field("autosave", &self.autosave)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Start editing `key`.
    ///
    /// `server_version` is the current server state, or `None` for an
    /// entity that does not exist yet (the default config is used). A stored
    /// draft for `key` puts the session in
    /// [`EditorState::AwaitingDraftDecision`].
    pub fn open(
        key: DraftKey,
        server_version: Option<Value>,
        drafts: DraftService,
        validator: impl SchemaValidator + 'static,
    ) -> Self {
        let initial = server_version.clone().unwrap_or_else(default_config);
        let pending_draft = drafts.load_draft(&key);
        if pending_draft.is_some() {
            info!(draft = %key, "stored draft found");
        }
        Self {
            key,
            drafts,
            validator: Box::new(validator),
            working: initial.clone(),
            remembered: initial.clone(),
            base: initial,
            server: server_version,
            pending_draft,
            conflict: None,
            autosave: None,
        }
    }

    /// Persist drafts after `delay` of inactivity following each edit.
    pub fn with_autosave(mut self, delay: Duration) -> Self {
        self.autosave = Some(AutosaveScheduler::new(
            self.drafts.clone(),
            self.key.clone(),
            delay,
        ));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn key(&self) -> &DraftKey {
        &self.key
    }

    pub fn state(&self) -> EditorState {
        if self.pending_draft.is_some() {
            EditorState::AwaitingDraftDecision
        } else if self.conflict.is_some() {
            EditorState::Conflicted
        } else if self.is_dirty() {
            EditorState::Dirty
        } else {
            EditorState::Clean
        }
    }

    pub fn working(&self) -> &Value {
        &self.working
    }

    /// Latest server version seen.
    pub fn server_version(&self) -> Option<&Value> {
        self.server.as_ref()
    }

    /// The stored draft awaiting a decision.
    pub fn pending_draft(&self) -> Option<&DraftEntry> {
        self.pending_draft.as_ref()
    }

    pub fn conflict(&self) -> Option<&ConflictRecord> {
        self.conflict.as_ref()
    }

    /// Whether the working state differs from the last loaded or saved state.
    pub fn is_dirty(&self) -> bool {
        !deep_equals(&self.working, &self.remembered)
    }

    pub fn autosave(&self) -> Option<&AutosaveScheduler> {
        self.autosave.as_ref()
    }

    /// The working state with empty strings stripped, ready to upload.
    pub fn payload(&self) -> Value {
        sanitize(&self.working).unwrap_or(Value::Null)
    }

    /// Run the validator over the working state.
    pub fn validate(&self) -> Result<(), EditorError> {
        self.validator
            .validate(&self.working)
            .map_err(EditorError::Validation)
    }

    // =========================================================================
    // Draft decision
    // =========================================================================

    /// Adopt the stored draft.
    ///
    /// With a server version the draft is merged onto it
    /// (`merge(draft.base, server, draft.modified)`); without one the draft's
    /// modified state is used as is. The result must pass the validator; on
    /// failure the draft stays stored and pending.
    pub fn restore_draft(&mut self) -> Result<&Value, EditorError> {
        let draft = self
            .pending_draft
            .as_ref()
            .ok_or(EditorError::NoPendingDraft)?;

        let restored = match &self.server {
            Some(server) => merge(&draft.base, server, &draft.modified),
            None => draft.modified.clone(),
        };
        self.validator
            .validate(&restored)
            .map_err(EditorError::Validation)?;

        self.drafts.clear_draft(&self.key)?;
        self.pending_draft = None;
        self.working = restored;
        info!(draft = %self.key, "draft restored");

        if self.is_dirty() {
            self.schedule_autosave();
        }
        Ok(&self.working)
    }

    /// Drop the stored draft and keep the server (or default) state.
    pub fn discard_draft(&mut self) -> Result<(), EditorError> {
        if self.pending_draft.is_none() {
            return Err(EditorError::NoPendingDraft);
        }
        self.drafts.clear_draft(&self.key)?;
        self.pending_draft = None;
        info!(draft = %self.key, "draft discarded");
        Ok(())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Replace the working state.
    pub fn edit(&mut self, value: Value) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.working = value;
        self.schedule_autosave();
        Ok(())
    }

    /// Change the working state in place.
    pub fn update<F>(&mut self, change: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut Value),
    {
        self.ensure_editable()?;
        change(&mut self.working);
        self.schedule_autosave();
        Ok(())
    }

    /// Record that the working state was saved to the server.
    ///
    /// The saved state becomes the remembered snapshot and the draft base;
    /// the stored draft, any conflict and any pending autosave are dropped.
    pub fn mark_saved(&mut self) -> Result<(), EditorError> {
        self.ensure_editable()?;
        self.cancel_autosave();
        self.drafts.clear_draft(&self.key)?;
        self.adopt_as_synced(self.working.clone());
        debug!(draft = %self.key, "saved");
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), EditorError> {
        if self.pending_draft.is_some() {
            Err(EditorError::DraftDecisionPending)
        } else {
            Ok(())
        }
    }

    fn cancel_autosave(&mut self) {
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.cancel();
        }
    }

    fn schedule_autosave(&mut self) {
        if let Some(autosave) = self.autosave.as_mut() {
            autosave.schedule(self.base.clone(), self.working.clone());
        }
    }

    /// Make `snapshot` the synced state: remembered, base and server version.
    fn adopt_as_synced(&mut self, snapshot: Value) {
        self.remembered = snapshot.clone();
        self.base = snapshot.clone();
        self.server = Some(snapshot);
        self.conflict = None;
    }

    // =========================================================================
    // Server changes
    // =========================================================================

    /// Compare a fresh server snapshot with the remembered one.
    ///
    /// A clean session adopts a changed snapshot and drops any pending
    /// autosave and stored draft; a dirty one records a conflict and keeps
    /// its edits.
    pub fn observe_server(&mut self, snapshot: Value) -> ServerObservation {
        if deep_equals(&snapshot, &self.remembered) {
            self.server = Some(snapshot);
            return ServerObservation::Unchanged;
        }

        if !self.is_dirty() {
            // A pending autosave still holds the previous snapshot.
            self.cancel_autosave();
            if let Err(e) = self.drafts.clear_draft(&self.key) {
                warn!(draft = %self.key, error = %e, "cannot clear draft after reload");
            }
            self.working = snapshot.clone();
            self.adopt_as_synced(snapshot);
            debug!(draft = %self.key, "clean session reloaded from server");
            return ServerObservation::Reloaded;
        }

        let record = ConflictRecord {
            entity: self.key.id().map(str::to_string),
            server: snapshot.clone(),
        };
        info!(draft = %self.key, "server changed while local edits are outstanding");
        self.server = Some(snapshot);
        self.conflict = Some(record.clone());
        ServerObservation::Conflict(record)
    }

    /// Fetch the entity through `loader` and [`observe_server`](Self::observe_server) it.
    ///
    /// A session on an unsaved entity has nothing to fetch.
    pub async fn refresh_from_server(
        &mut self,
        loader: &dyn EntityLoader,
    ) -> Result<ServerObservation, EditorError> {
        let Some(id) = self.key.id() else {
            return Ok(ServerObservation::Unchanged);
        };
        let snapshot = loader.load(id).await?;
        Ok(self.observe_server(snapshot))
    }

    /// Settle the recorded conflict.
    ///
    /// - `ReloadFromServer`: the server version replaces the working state
    ///   and the stored draft is dropped.
    /// - `KeepLocal`: the server version becomes the remembered snapshot, so
    ///   the same change is not reported again; the working state is kept.
    pub fn resolve_conflict(&mut self, resolution: ConflictResolution) -> Result<(), EditorError> {
        let record = self.conflict.take().ok_or(EditorError::NoConflict)?;
        match resolution {
            ConflictResolution::ReloadFromServer => {
                self.cancel_autosave();
                self.drafts.clear_draft(&self.key)?;
                self.working = record.server.clone();
                self.adopt_as_synced(record.server);
            }
            ConflictResolution::KeepLocal => {
                self.remembered = record.server;
            }
        }
        info!(draft = %self.key, ?resolution, "conflict resolved");
        Ok(())
    }

    /// End the session, aborting any pending autosave.
    pub fn close(mut self) {
        self.cancel_autosave();
    }
}
