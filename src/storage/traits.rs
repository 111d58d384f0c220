//! storage::traits
//!
//! Durable key-value store trait definition.
//!
//! # Design
//!
//! The `KvStore` trait is a string-to-string map with whole-value writes.
//! There is no partial update: every `set` replaces the stored value, so two
//! writers of the same key can only ever leave one complete value behind.
//!
//! Keys are namespaced by prefix (`autosave:<id>`, `auth:token`) so unrelated
//! users of one store never collide.

use thiserror::Error;

/// Errors from key-value storage operations.
///
/// Messages name the key and the failure, never the stored value.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read from storage.
    #[error("failed to read '{key}': {message}")]
    ReadError { key: String, message: String },

    /// Failed to write to storage.
    #[error("failed to write '{key}': {message}")]
    WriteError { key: String, message: String },

    /// Failed to delete from storage.
    #[error("failed to delete '{key}': {message}")]
    DeleteError { key: String, message: String },

    /// The store location cannot be used.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Trait for durable key-value stores.
///
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
///
/// ```
/// use spedit::storage::{KvStore, MemoryKvStore};
///
/// let store = MemoryKvStore::new();
/// store.set("autosave:p1", "{}").unwrap();
/// assert!(store.exists("autosave:p1").unwrap());
/// store.delete("autosave:p1").unwrap();
/// assert_eq!(store.get("autosave:p1").unwrap(), None);
/// ```
pub trait KvStore: Send + Sync {
    /// Get a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set a value, replacing any existing value for the key.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// All keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StoreError::ReadError {
            key: "autosave:p1".into(),
            message: "disk full".into(),
        };
        assert!(err.to_string().contains("read"));
        assert!(err.to_string().contains("autosave:p1"));

        let err = StoreError::WriteError {
            key: "k".into(),
            message: "permission denied".into(),
        };
        assert!(err.to_string().contains("write"));

        let err = StoreError::DeleteError {
            key: "k".into(),
            message: "io error".into(),
        };
        assert!(err.to_string().contains("delete"));

        let err = StoreError::Unavailable("no home".into());
        assert!(err.to_string().contains("unavailable"));
    }
}
