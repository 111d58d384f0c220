//! storage::file_store
//!
//! File-based key-value store.
//!
//! # Layout
//!
//! - One file per key: `<dir>/<sha256(key) as hex>.json`
//! - File content is an envelope `{"key": ..., "value": ...}` so keys can be
//!   enumerated without a separate index
//! - `<dir>/.lock` is held exclusively (fs2) while writing or deleting
//!
//! # Guarantees
//!
//! - Writes are atomic (write to temp file, sync, then rename), so a reader
//!   sees either the old value or the new one
//! - Writers are serialized across processes by the lock file
//! - Files are created with 0600 permissions on Unix
//!
//! # Example
//!
//! ```ignore
//! use spedit::storage::{FileKvStore, KvStore};
//!
//! let store = FileKvStore::new(dirs::home_dir().unwrap().join(".spedit/store"));
//! store.set("autosave:p1", r#"{"base":{},"modified":{},"savedAt":"..."}"#)?;
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::traits::{KvStore, StoreError};

/// Name of the writer lock file inside the store directory.
const LOCK_FILE: &str = ".lock";

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    key: String,
    value: String,
}

/// File-based key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Take the exclusive writer lock, creating the directory if needed.
    ///
    /// The lock is released when the returned file is dropped.
    fn lock(&self, key: &str) -> Result<File, StoreError> {
        let write_err = |message: String| StoreError::WriteError {
            key: key.to_string(),
            message,
        };

        fs::create_dir_all(&self.dir)
            .map_err(|e| write_err(format!("cannot create {}: {}", self.dir.display(), e)))?;

        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))
            .map_err(|e| write_err(format!("cannot open lock file: {}", e)))?;
        lock.lock_exclusive()
            .map_err(|e| write_err(format!("cannot lock store: {}", e)))?;
        Ok(lock)
    }

    fn read_envelope(path: &Path) -> Result<Option<Envelope>, String> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("cannot read {}: {}", path.display(), e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| format!("cannot parse {}: {}", path.display(), e))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.entry_path(key);
        let envelope = Self::read_envelope(&path).map_err(|message| StoreError::ReadError {
            key: key.to_string(),
            message,
        })?;
        Ok(envelope.filter(|e| e.key == key).map(|e| e.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _lock = self.lock(key)?;
        let write_err = |message: String| StoreError::WriteError {
            key: key.to_string(),
            message,
        };

        let content = serde_json::to_string(&Envelope {
            key: key.to_string(),
            value: value.to_string(),
        })
        .map_err(|e| write_err(format!("cannot serialize entry: {}", e)))?;

        let path = self.entry_path(key);
        let temp_path = path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| write_err(format!("cannot create temp file: {}", e)))?;

            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| write_err(format!("cannot set permissions: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| write_err(format!("cannot write entry: {}", e)))?;
            file.sync_all()
                .map_err(|e| write_err(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &path)
            .map_err(|e| write_err(format!("cannot rename temp file: {}", e)))
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(());
        }

        let _lock = self.lock(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::DeleteError {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    key: prefix.to_string(),
                    message: format!("cannot list {}: {}", self.dir.display(), e),
                })
            }
        };

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_envelope(&path) {
                Ok(Some(envelope)) if envelope.key.starts_with(prefix) => keys.push(envelope.key),
                Ok(_) => {}
                Err(message) => tracing::warn!(%message, "skipping unreadable store entry"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
