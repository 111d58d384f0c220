//! spedit - draft, merge and sync core for smart playlist pattern configs
//!
//! spedit holds the parts of a pattern-config editor that have real
//! invariants: a three-way JSON merge that never loses user edits, local
//! drafts with a restore-or-discard protocol, dirty tracking and conflict
//! detection against server changes, and an authenticated REST client that
//! recovers from an expired token with a single shared refresh.
//!
//! # Architecture
//!
//! - [`merge`] - Three-way JSON merge and upload sanitizing
//! - [`drafts`] - Draft entries and their persistence
//! - [`editor`] - Editing sessions: restore offer, dirty tracking, conflicts,
//!   debounced autosave
//! - [`auth`] - Credentials and the injectable session
//! - [`api`] - Authenticated client with single-flight refresh and retry-once
//! - [`storage`] - Durable key-value store abstraction
//! - [`core`] - JSON helpers, configuration, on-disk paths
//! - [`cli`] - Command-line interface
//!
//! # Guarantees
//!
//! 1. A merge always yields a value; where both sides changed a value the
//!    user's edit wins
//! 2. A corrupted draft reads as absent, never as an error
//! 3. At most one token refresh is in flight; a request is retried at most
//!    once
//! 4. Tokens never appear in logs, errors or debug output

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod drafts;
pub mod editor;
pub mod merge;
pub mod storage;
