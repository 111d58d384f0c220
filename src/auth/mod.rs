//! auth
//!
//! Credential state for the authenticated API client.
//!
//! # Architecture
//!
//! - [`Credentials`]: the access/refresh token pair
//! - [`Session`]: injectable, thread-safe token state with an explicit
//!   [`SessionObserver`] interface for "refreshed" and "unauthorized" events
//! - [`PersistedSession`]: an observer that mirrors tokens into a
//!   [`KvStore`](crate::storage::KvStore) so a later run can restore them
//!
//! The core never persists tokens on its own; persistence happens only
//! through an attached observer.
//!
//! # Security
//!
//! Tokens never appear in logs, error messages or `Debug` output.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spedit::auth::{Credentials, PersistedSession, Session};
//! use spedit::storage::MemoryKvStore;
//!
//! let store = Arc::new(MemoryKvStore::new());
//! let persisted = Arc::new(PersistedSession::new(store));
//! persisted.save(&Credentials::new("access", "refresh")).unwrap();
//!
//! let session = Session::new();
//! assert!(persisted.attach(&session).unwrap());
//! assert!(session.is_authenticated());
//! ```

mod credentials;
mod persist;
mod session;

pub use credentials::Credentials;
pub use persist::{PersistedSession, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use session::{Session, SessionObserver};
