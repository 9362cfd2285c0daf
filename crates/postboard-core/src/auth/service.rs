use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::models::{Credentials, StoredSession, User};
use crate::store::SessionStore;

use super::{token, AuthError, IdentityBackend};

/// Login, logout and current-user lookup.
///
/// Constructed once by the application root and handed to the
/// `SessionProvider`; tests build their own over a `MemoryStore`.
#[derive(Clone)]
pub struct SessionService {
    backend: Arc<dyn IdentityBackend>,
    store: SessionStore,
}

impl SessionService {
    pub fn new(backend: Arc<dyn IdentityBackend>, store: SessionStore) -> Self {
        Self { backend, store }
    }

    /// Sign in. Email and password are expected to be non-empty already.
    ///
    /// On success the session record is persisted before returning.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        debug!(email = %credentials.email, "Login requested");

        let registered = self.backend.register(credentials).await.map_err(|e| {
            error!(error = %e, "Login error");
            AuthError::Rejected(e)
        })?;

        let now = Utc::now();
        let user = User::from_email(registered.id, &credentials.email);
        let session = StoredSession {
            token: token::issue(&credentials.email, now),
            user: user.clone(),
            created_at: now,
        };

        self.store.save(&session).map_err(|e| {
            error!(error = %e, "Failed to persist session");
            AuthError::Storage(e)
        })?;

        info!(user_id = user.id, "Login successful");
        Ok(user)
    }

    /// Forget the persisted session. Safe to call when signed out.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        info!("Logged out");
    }

    /// The persisted user, or `None` when absent or unreadable.
    pub fn current_user(&self) -> Option<User> {
        self.read_session().map(|s| s.user)
    }

    pub fn current_token(&self) -> Option<String> {
        self.read_session().map(|s| s.token)
    }

    /// True when a token is persisted. Integrity and age are not checked.
    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    /// The persisted session, only if its token was issued for its user.
    pub fn restore(&self) -> Option<StoredSession> {
        let session = self.read_session()?;
        match token::email_of(&session.token) {
            Some(email) if email == session.user.email => Some(session),
            _ => {
                warn!(user_id = session.user.id, "Persisted token does not match persisted user");
                None
            }
        }
    }

    fn read_session(&self) -> Option<StoredSession> {
        match self.store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Error reading persisted session");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{service_with, FakeBackend};
    use crate::store::{KeyValueStore, MemoryStore, SESSION_KEY};

    #[tokio::test]
    async fn test_login_then_authenticated() {
        let (service, _) = service_with(FakeBackend::ok(None));
        assert!(!service.is_authenticated());

        let user = service.login(&Credentials::new("a@b.com", "secret")).await.unwrap();
        assert_eq!(user, User::from_email(Some(1), "a@b.com"));

        assert!(service.is_authenticated());
        let current = service.current_user().expect("user should be persisted");
        assert_eq!(current.email, "a@b.com");
        assert_eq!(current.name, "a");
        assert_eq!(current.id, 1);
        let token = service.current_token().unwrap();
        assert_eq!(token::email_of(&token).as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_login_uses_backend_id() {
        let (service, _) = service_with(FakeBackend::ok(Some(11)));
        let user = service.login(&Credentials::new("jo@example.org", "pw1234")).await.unwrap();
        assert_eq!(user.id, 11);
        assert_eq!(service.current_user().unwrap().id, 11);
    }

    #[tokio::test]
    async fn test_second_login_overwrites() {
        let (service, store) = service_with(FakeBackend::ok(None));
        service.login(&Credentials::new("a@b.com", "secret")).await.unwrap();
        service.login(&Credentials::new("x@y.com", "pw")).await.unwrap();

        let user = service.current_user().unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "x@y.com");
        assert_eq!(user.name, "x");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_login_persists_nothing() {
        let (service, store) = service_with(FakeBackend::failing());
        let err = service.login(&Credentials::new("a@b.com", "secret")).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        assert_eq!(err.user_message(), "Authentication failed. Please check your credentials.");
        assert!(store.is_empty());
        assert!(!service.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (service, store) = service_with(FakeBackend::ok(None));
        service.logout();
        assert!(!service.is_authenticated());

        service.login(&Credentials::new("a@b.com", "secret")).await.unwrap();
        service.logout();
        service.logout();
        assert!(!service.is_authenticated());
        assert_eq!(service.current_user(), None);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_record_reads_as_no_user() {
        let (service, store) = service_with(FakeBackend::ok(None));
        store.set(SESSION_KEY, r#"{"token":"abc","user":{"id":1,"name":"a","em"#).unwrap();
        assert_eq!(service.current_user(), None);
        assert_eq!(service.restore(), None);
        assert!(!service.is_authenticated());
    }

    #[test]
    fn test_restore_rejects_mismatched_token() {
        let (service, _) = service_with(FakeBackend::ok(None));
        let session = StoredSession::new(
            token::issue("someone@else.com", Utc::now()),
            User::from_email(None, "a@b.com"),
        );
        service.store.save(&session).unwrap();

        assert!(service.current_user().is_some());
        assert_eq!(service.restore(), None);
    }

    #[test]
    fn test_new_service_over_empty_store() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let service = SessionService::new(
            std::sync::Arc::new(FakeBackend::ok(None)),
            SessionStore::new(store),
        );
        assert_eq!(service.current_user(), None);
        assert_eq!(service.current_token(), None);
    }

    #[tokio::test]
    async fn test_login_replaces_corrupt_storage_file() {
        use crate::store::FileStore;

        let dir = tempfile::tempdir().unwrap();
        let files = FileStore::new(dir.path());
        std::fs::write(files.path(), r#"{"session": "{\"tok"#).unwrap();
        let service = SessionService::new(
            std::sync::Arc::new(FakeBackend::ok(None)),
            SessionStore::new(std::sync::Arc::new(files)),
        );

        assert!(!service.is_authenticated());
        service.logout();
        service.login(&Credentials::new("a@b.com", "secret")).await.unwrap();
        assert!(service.is_authenticated());
        assert_eq!(service.restore().map(|s| s.user.email).as_deref(), Some("a@b.com"));
    }
}
