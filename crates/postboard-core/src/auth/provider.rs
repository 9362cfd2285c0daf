//! Application-wide session state.
//!
//! `SessionProvider` turns the `SessionService` into a watchable value.
//! One provider exists per running application; it is created by the
//! application root and passed to everything that reads the session.
//! Clone is cheap - clones share the same state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::{Credentials, User};

use super::{AuthError, SessionService};

/// Snapshot of the session as the UI sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set once the persisted session has been read
    pub initialized: bool,
}

impl SessionState {
    /// State before the persisted session has been read.
    /// `loading` starts true so guards wait for initialization.
    pub fn uninitialized() -> Self {
        Self {
            is_authenticated: false,
            user: None,
            token: None,
            loading: true,
            error: None,
            initialized: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            loading: false,
            initialized: true,
            ..Self::uninitialized()
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.initialized {
            SessionPhase::Uninitialized
        } else if self.loading {
            SessionPhase::Loading
        } else if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::uninitialized()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Authenticated,
    Unauthenticated,
}

struct Inner {
    service: SessionService,
    state: watch::Sender<SessionState>,
    mounted: AtomicBool,
}

#[derive(Clone)]
pub struct SessionProvider {
    inner: Arc<Inner>,
}

impl SessionProvider {
    pub fn new(service: SessionService) -> Self {
        let (state, _) = watch::channel(SessionState::uninitialized());
        Self {
            inner: Arc::new(Inner {
                service,
                state,
                mounted: AtomicBool::new(true),
            }),
        }
    }

    /// Read the persisted session and settle into a signed-in or signed-out state.
    pub fn initialize(&self) {
        let restored = self.inner.service.restore();
        debug!(restored = restored.is_some(), "Session provider initialized");

        self.update(|state| {
            *state = SessionState::signed_out();
            if let Some(session) = restored {
                state.is_authenticated = true;
                state.token = Some(session.token);
                state.user = Some(session.user);
            }
        });
    }

    /// Sign in. Failures are returned and also published as `error`;
    /// they never sign out an existing session.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.inner.service.login(credentials).await;

        match result {
            Ok(_) => {
                // Published state comes from the persisted pair, never the reply alone
                let restored = self.inner.service.restore();
                if restored.is_none() {
                    warn!("Signed in but the session could not be read back");
                }
                self.update(|state| {
                    state.is_authenticated = restored.is_some();
                    state.user = restored.as_ref().map(|s| s.user.clone());
                    state.token = restored.map(|s| s.token);
                    state.loading = false;
                });
            }
            Err(ref e) => {
                let message = e.user_message();
                self.update(|state| {
                    state.error = Some(message);
                    state.loading = false;
                });
            }
        }

        result
    }

    pub fn logout(&self) {
        self.inner.service.logout();
        self.update(|state| *state = SessionState::signed_out());
    }

    /// End the provider's scope. Later updates are dropped.
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::SeqCst);
        debug!("Session provider unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.borrow().phase()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// Receiver that wakes on every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    fn update(&self, modify: impl FnOnce(&mut SessionState)) {
        if !self.is_mounted() {
            debug!("Session provider unmounted, ignoring state update");
            return;
        }
        self.inner.state.send_modify(modify);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::auth::testing::{service_over, service_with, FakeBackend};
    use crate::store::{KeyValueStore, MemoryStore, SessionStore, StoreError, SESSION_KEY};

    /// Accepts writes but never returns anything
    struct ForgetfulStore;

    impl KeyValueStore for ForgetfulStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn creds(email: &str) -> Credentials {
        Credentials::new(email, "secret")
    }

    #[test]
    fn test_starts_uninitialized_and_loading() {
        let (service, _) = service_with(FakeBackend::ok(None));
        let provider = SessionProvider::new(service);
        let state = provider.state();
        assert_eq!(state.phase(), SessionPhase::Uninitialized);
        assert!(state.loading);
        assert!(!state.is_authenticated);
    }

    #[test]
    fn test_initialize_empty_store() {
        let (service, _) = service_with(FakeBackend::ok(None));
        let provider = SessionProvider::new(service);
        provider.initialize();
        assert_eq!(provider.state(), SessionState::signed_out());
        assert_eq!(provider.phase(), SessionPhase::Unauthenticated);
    }

    #[test]
    fn test_initialize_malformed_record_is_signed_out() {
        let (service, store) = service_with(FakeBackend::ok(None));
        store.set(SESSION_KEY, "{\"token\": \"dHJ1bmM").unwrap();
        let provider = SessionProvider::new(service);
        provider.initialize();
        assert_eq!(provider.phase(), SessionPhase::Unauthenticated);
        assert_eq!(provider.user(), None);
        assert_eq!(provider.token(), None);
    }

    #[tokio::test]
    async fn test_login_updates_state() {
        let (service, _) = service_with(FakeBackend::ok(None));
        let provider = SessionProvider::new(service.clone());
        provider.initialize();

        let user = provider.login(&creds("a@b.com")).await.unwrap();
        let state = provider.state();
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert_eq!(state.user, Some(user));
        assert_eq!(state.token, service.current_token());
        assert!(state.token.is_some());
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_reload_restores_session() {
        let backend = Arc::new(FakeBackend::ok(None));
        let store = Arc::new(MemoryStore::new());

        let first = SessionProvider::new(service_over(backend.clone(), store.clone()));
        first.initialize();
        first.login(&creds("a@b.com")).await.unwrap();
        first.unmount();

        let second = SessionProvider::new(service_over(backend, store));
        second.initialize();
        assert!(second.is_authenticated());
        assert_eq!(second.user().map(|u| u.email).as_deref(), Some("a@b.com"));
        assert_eq!(second.token(), first.token());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_signed_out() {
        let (service, _) = service_with(FakeBackend::failing());
        let provider = SessionProvider::new(service);
        provider.initialize();

        let result = provider.login(&creds("a@b.com")).await;
        assert!(result.is_err());
        let state = provider.state();
        assert!(!state.loading);
        assert!(!state.is_authenticated);
        assert_eq!(
            state.error.as_deref(),
            Some("Authentication failed. Please check your credentials.")
        );
    }

    #[tokio::test]
    async fn test_failed_login_keeps_signed_in() {
        let backend = Arc::new(FakeBackend::ok(None));
        let provider = SessionProvider::new(service_over(backend.clone(), Arc::new(MemoryStore::new())));
        provider.initialize();
        provider.login(&creds("a@b.com")).await.unwrap();

        backend.set_failing(true);
        assert!(provider.login(&creds("x@y.com")).await.is_err());

        let state = provider.state();
        assert!(state.is_authenticated);
        assert_eq!(state.user.map(|u| u.email).as_deref(), Some("a@b.com"));
        assert!(state.error.is_some());
        assert!(!state.loading);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_login_clears_previous_error() {
        let backend = Arc::new(FakeBackend::failing());
        let provider = SessionProvider::new(service_over(backend.clone(), Arc::new(MemoryStore::new())));
        provider.initialize();
        let _ = provider.login(&creds("a@b.com")).await;
        assert!(provider.error().is_some());

        backend.set_failing(false);
        provider.login(&creds("a@b.com")).await.unwrap();
        assert_eq!(provider.error(), None);
    }

    #[tokio::test]
    async fn test_loading_is_published_while_login_in_flight() {
        let backend = FakeBackend::ok(None).delayed(Duration::from_millis(50));
        let (service, _) = service_with(backend);
        let provider = SessionProvider::new(service);
        provider.initialize();

        let mut rx = provider.subscribe();
        let task = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.login(&creds("a@b.com")).await })
        };

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().phase(), SessionPhase::Loading);

        task.await.unwrap().unwrap();
        assert_eq!(provider.phase(), SessionPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_logout_resets_state() {
        let (service, store) = service_with(FakeBackend::ok(None));
        let provider = SessionProvider::new(service);
        provider.initialize();
        provider.login(&creds("a@b.com")).await.unwrap();

        provider.logout();
        assert_eq!(provider.state(), SessionState::signed_out());
        assert!(store.is_empty());

        provider.logout();
        assert_eq!(provider.phase(), SessionPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_update_after_unmount_is_ignored() {
        let backend = FakeBackend::ok(None).delayed(Duration::from_millis(50));
        let (service, _) = service_with(backend);
        let provider = SessionProvider::new(service.clone());
        provider.initialize();

        let task = {
            let provider = provider.clone();
            tokio::spawn(async move { provider.login(&creds("a@b.com")).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        provider.unmount();
        let frozen = provider.state();

        // The login itself still completes and persists
        assert!(task.await.unwrap().is_ok());
        assert!(service.is_authenticated());
        assert_eq!(provider.state(), frozen);
        assert!(!provider.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_without_readable_session_stays_signed_out() {
        let service = SessionService::new(
            Arc::new(FakeBackend::ok(None)),
            SessionStore::new(Arc::new(ForgetfulStore)),
        );
        let provider = SessionProvider::new(service);
        provider.initialize();

        assert!(provider.login(&creds("a@b.com")).await.is_ok());
        let state = provider.state();
        assert!(!state.is_authenticated);
        assert_eq!(state.user, None);
        assert_eq!(state.token, None);
        assert!(!state.loading);
    }
}
