//! storage
//!
//! Durable key-value storage for drafts and the persisted session.
//!
//! # Architecture
//!
//! Values are stored through the [`KvStore`] trait, which has two
//! implementations:
//!
//! - [`FileKvStore`]: one file per key under `~/.spedit/store` (default)
//! - [`MemoryKvStore`]: process-local map, for tests and embedding
//!
//! # Guarantees
//!
//! - Every write replaces the whole value for a key
//! - File store writes are atomic (temp file + rename)
//! - File store uses 0600 permissions on Unix (owner read/write only)
//!
//! # Example
//!
//! ```ignore
//! use spedit::core::config::Config;
//! use spedit::storage::open_store;
//!
//! let config = Config::load()?;
//! let store = open_store(&config)?;
//! store.set("autosave:p1", "{...}")?;
//! ```

mod file_store;
mod memory_store;
mod traits;

use std::sync::Arc;

pub use file_store::FileKvStore;
pub use memory_store::MemoryKvStore;
pub use traits::{KvStore, StoreError};

use crate::core::config::Config;

/// Open the file-backed store at the configured location.
///
/// # Errors
///
/// Returns [`StoreError::Unavailable`] when no store directory can be
/// resolved (no configured `store_dir` and no home directory).
pub fn open_store(config: &Config) -> Result<Arc<dyn KvStore>, StoreError> {
    let dir = config
        .store_dir()
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    tracing::debug!(dir = %dir.display(), "opening file store");
    Ok(Arc::new(FileKvStore::new(dir)))
}
