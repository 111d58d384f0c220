//! core::paths
//!
//! Centralized path routing for spedit storage locations.
//!
//! # Storage Layout
//!
//! All user-scoped data lives under a single data directory (default
//! `~/.spedit/`):
//! - `config.toml` - Global configuration (canonical write location)
//! - `store/` - Durable key-value store (drafts, persisted session)
//!
//! No code outside this module should compute `*.join(".spedit")` paths.
//!
//! # Example
//!
//! ```
//! use spedit::core::paths::SpeditPaths;
//! use std::path::PathBuf;
//!
//! let paths = SpeditPaths::new(PathBuf::from("/home/me/.spedit"));
//! assert_eq!(paths.config_path(), PathBuf::from("/home/me/.spedit/config.toml"));
//! assert_eq!(paths.store_dir(), PathBuf::from("/home/me/.spedit/store"));
//! ```

use std::path::{Path, PathBuf};

/// Name of the per-user data directory under `$HOME`.
pub const DATA_DIR_NAME: &str = ".spedit";

/// Centralized path routing for spedit storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeditPaths {
    root: PathBuf,
}

impl SpeditPaths {
    /// Route all storage under an explicit root directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Paths rooted at `~/.spedit`.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn from_home() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(DATA_DIR_NAME)))
    }

    /// The data directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical global config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Default directory for the durable key-value store.
    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }
}
