//! auth::persist
//!
//! Mirror session credentials into a durable [`KvStore`].
//!
//! Tokens are stored under two keys, `auth:token` and `auth:refreshToken`.
//! A stored session is restored only when both keys are present.

use std::sync::Arc;

use tracing::{debug, warn};

use super::credentials::Credentials;
use super::session::{Session, SessionObserver};
use crate::storage::{KvStore, StoreError};

/// Key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "auth:token";

/// Key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "auth:refreshToken";

/// Session observer that keeps credentials in a store across runs.
pub struct PersistedSession {
    store: Arc<dyn KvStore>,
}

impl PersistedSession {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Read stored credentials. Missing either token means no session.
    pub fn load(&self) -> Result<Option<Credentials>, StoreError> {
        let access = self.store.get(ACCESS_TOKEN_KEY)?;
        let refresh = self.store.get(REFRESH_TOKEN_KEY)?;
        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(Credentials::new(access, refresh)),
            _ => None,
        })
    }

    /// Store both tokens.
    pub fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        self.store.set(ACCESS_TOKEN_KEY, &credentials.access_token)?;
        self.store.set(REFRESH_TOKEN_KEY, &credentials.refresh_token)
    }

    /// Remove both tokens.
    pub fn remove(&self) -> Result<(), StoreError> {
        self.store.delete(ACCESS_TOKEN_KEY)?;
        self.store.delete(REFRESH_TOKEN_KEY)
    }

    /// Load stored credentials into `session` and keep them in sync.
    ///
    /// Returns whether a stored session was found.
    pub fn attach(self: &Arc<Self>, session: &Session) -> Result<bool, StoreError> {
        let restored = match self.load()? {
            Some(credentials) => {
                session.set_credentials(credentials);
                true
            }
            None => false,
        };
        session.subscribe(self.clone());
        debug!(restored, "persisted session attached");
        Ok(restored)
    }
}

impl SessionObserver for PersistedSession {
    fn on_refreshed(&self, credentials: &Credentials) {
        if let Err(e) = self.save(credentials) {
            warn!(error = %e, "cannot persist refreshed credentials");
        }
    }

    fn on_unauthorized(&self) {
        if let Err(e) = self.remove() {
            warn!(error = %e, "cannot remove persisted credentials");
        }
    }
}
