//! auth::session
//!
//! Injectable session state shared by the API client and its collaborators.
//!
//! # Design
//!
//! A [`Session`] owns the current tokens behind a `RwLock` and a list of
//! [`SessionObserver`]s. The API client reads and replaces tokens through it
//! and announces refreshes and logouts; observers (such as
//! [`PersistedSession`](super::PersistedSession)) react to those
//! announcements. Observers are called after the token lock is released, so
//! an observer may read the session.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::credentials::Credentials;

/// Receives session lifecycle notifications.
pub trait SessionObserver: Send + Sync {
    /// New credentials were obtained from the refresh endpoint.
    fn on_refreshed(&self, _credentials: &Credentials) {}

    /// The server rejected the session; the user is logged out.
    fn on_unauthorized(&self) {}
}

#[derive(Default)]
struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Shared credential state with explicit change notification.
#[derive(Default)]
pub struct Session {
    tokens: RwLock<TokenState>,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens = self.read_tokens();
        f.debug_struct("Session")
            .field("has_access_token", &tokens.access_token.is_some())
            .field("has_refresh_token", &tokens.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// An unauthenticated session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session holding `credentials`.
    pub fn with_credentials(credentials: Credentials) -> Self {
        let session = Self::new();
        session.set_credentials(credentials);
        session
    }

    fn read_tokens(&self) -> RwLockReadGuard<'_, TokenState> {
        self.tokens.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_tokens(&self) -> RwLockWriteGuard<'_, TokenState> {
        self.tokens.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace both tokens.
    pub fn set_credentials(&self, credentials: Credentials) {
        let mut tokens = self.write_tokens();
        tokens.access_token = Some(credentials.access_token);
        tokens.refresh_token = Some(credentials.refresh_token);
    }

    /// Replace only the access token. A held refresh token is kept.
    pub fn set_access_token(&self, access_token: impl Into<String>) {
        self.write_tokens().access_token = Some(access_token.into());
    }

    /// Drop the access token, keeping any refresh token.
    pub fn clear_access_token(&self) {
        self.write_tokens().access_token = None;
    }

    /// Drop both tokens.
    pub fn clear(&self) {
        let mut tokens = self.write_tokens();
        tokens.access_token = None;
        tokens.refresh_token = None;
    }

    pub fn access_token(&self) -> Option<String> {
        self.read_tokens().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read_tokens().refresh_token.clone()
    }

    /// Both tokens, when both are held.
    pub fn credentials(&self) -> Option<Credentials> {
        let tokens = self.read_tokens();
        match (&tokens.access_token, &tokens.refresh_token) {
            (Some(access), Some(refresh)) => Some(Credentials::new(access, refresh)),
            _ => None,
        }
    }

    /// Whether an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.read_tokens().access_token.is_some()
    }

    /// Register an observer for refresh and logout notifications.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(observer);
    }

    fn observers(&self) -> Vec<Arc<dyn SessionObserver>> {
        self.observers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Tell every observer that `credentials` replaced the previous tokens.
    pub fn notify_refreshed(&self, credentials: &Credentials) {
        for observer in self.observers() {
            observer.on_refreshed(credentials);
        }
    }

    /// Tell every observer that the user is no longer authorized.
    pub fn notify_unauthorized(&self) {
        for observer in self.observers() {
            observer.on_unauthorized();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        refreshed: Mutex<Vec<String>>,
        unauthorized: AtomicUsize,
    }

    impl SessionObserver for Recorder {
        fn on_refreshed(&self, credentials: &Credentials) {
            self.refreshed
                .lock()
                .unwrap()
                .push(credentials.access_token.clone());
        }

        fn on_unauthorized(&self) {
            self.unauthorized.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Silent;
    impl SessionObserver for Silent {}

    #[test]
    fn starts_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.credentials().is_none());
    }

    #[test]
    fn set_and_clear() {
        let session = Session::with_credentials(Credentials::new("a", "r"));
        assert!(session.is_authenticated());
        assert_eq!(session.credentials(), Some(Credentials::new("a", "r")));

        session.clear_access_token();
        assert!(!session.is_authenticated());
        assert_eq!(session.refresh_token().as_deref(), Some("r"));

        session.set_access_token("a2");
        assert_eq!(session.access_token().as_deref(), Some("a2"));

        session.clear();
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn observers_are_notified() {
        let session = Session::new();
        let recorder = Arc::new(Recorder::default());
        session.subscribe(recorder.clone());
        session.subscribe(Arc::new(Silent));

        session.notify_refreshed(&Credentials::new("new", "r"));
        session.notify_unauthorized();
        session.notify_unauthorized();

        assert_eq!(*recorder.refreshed.lock().unwrap(), vec!["new".to_string()]);
        assert_eq!(recorder.unauthorized.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_does_not_show_tokens() {
        let session = Session::with_credentials(Credentials::new("secret-a", "secret-r"));
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("has_access_token: true"));
    }
}
