//! core
//!
//! Shared building blocks for spedit.
//!
//! # Modules
//!
//! - [`json`] - JSON value helpers (structural equality, shape checks)
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for spedit storage

pub mod config;
pub mod json;
pub mod paths;
