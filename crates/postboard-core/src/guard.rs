//! Redirect-on-signed-out for protected views.

use tokio::sync::watch;
use tracing::info;

use crate::auth::SessionState;
use crate::router::{NavigateOptions, Navigator, LOGIN_PATH};

/// What a guard check concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still initializing or a login is in flight
    Waiting,
    Allowed,
    Redirected,
    /// Nothing relevant changed since the last check
    Unchanged,
}

/// Sends signed-out visitors of a protected view to the login page.
///
/// A guard belongs to one mounted view; create a new one when the view is
/// entered again.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    redirect_to: String,
    /// `(is_authenticated, loading)` from the previous check
    last_seen: Option<(bool, bool)>,
}

impl RouteGuard {
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            last_seen: None,
        }
    }

    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    /// Evaluate the session. Only reacts when authentication or loading
    /// changed since the previous call.
    pub fn check<N: Navigator + ?Sized>(&mut self, state: &SessionState, navigator: &mut N) -> GuardOutcome {
        let seen = (state.is_authenticated, state.loading);
        if self.last_seen == Some(seen) {
            return GuardOutcome::Unchanged;
        }
        self.last_seen = Some(seen);

        if state.loading {
            GuardOutcome::Waiting
        } else if state.is_authenticated {
            GuardOutcome::Allowed
        } else {
            info!(to = %self.redirect_to, "Not signed in, redirecting");
            navigator.navigate(&self.redirect_to, NavigateOptions::replace());
            GuardOutcome::Redirected
        }
    }

    /// Follow a provider subscription, checking on every change, until the
    /// provider is gone.
    pub async fn watch<N: Navigator + ?Sized>(
        mut self,
        mut states: watch::Receiver<SessionState>,
        navigator: &mut N,
    ) {
        loop {
            let state = states.borrow_and_update().clone();
            self.check(&state, navigator);
            if states.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::auth::testing::{service_over, FakeBackend};
    use crate::auth::SessionProvider;
    use crate::models::Credentials;
    use crate::store::MemoryStore;

    #[derive(Default)]
    struct RecordingNavigator {
        calls: Vec<(String, NavigateOptions)>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&mut self, path: &str, options: NavigateOptions) {
            self.calls.push((path.to_string(), options));
        }
    }

    fn state(is_authenticated: bool, loading: bool) -> SessionState {
        SessionState {
            is_authenticated,
            loading,
            ..SessionState::signed_out()
        }
    }

    #[test]
    fn test_waits_while_loading() {
        let mut guard = RouteGuard::default();
        let mut nav = RecordingNavigator::default();
        assert_eq!(guard.check(&SessionState::uninitialized(), &mut nav), GuardOutcome::Waiting);
        assert_eq!(guard.check(&state(false, true), &mut nav), GuardOutcome::Unchanged);
        assert!(nav.calls.is_empty());
    }

    #[test]
    fn test_redirects_exactly_once() {
        let mut guard = RouteGuard::default();
        let mut nav = RecordingNavigator::default();
        guard.check(&state(false, true), &mut nav);
        assert_eq!(guard.check(&state(false, false), &mut nav), GuardOutcome::Redirected);
        assert_eq!(guard.check(&state(false, false), &mut nav), GuardOutcome::Unchanged);

        assert_eq!(nav.calls, vec![("/login".to_string(), NavigateOptions { replace: true })]);
    }

    #[test]
    fn test_allows_signed_in() {
        let mut guard = RouteGuard::new("/signin");
        let mut nav = RecordingNavigator::default();
        assert_eq!(guard.check(&state(true, false), &mut nav), GuardOutcome::Allowed);
        assert!(nav.calls.is_empty());

        // Logging out later re-evaluates and redirects to the custom target
        assert_eq!(guard.check(&state(false, false), &mut nav), GuardOutcome::Redirected);
        assert_eq!(nav.calls[0].0, "/signin");
    }

    #[tokio::test]
    async fn test_watch_follows_provider() {
        let backend = Arc::new(FakeBackend::ok(None).delayed(Duration::from_millis(20)));
        let provider = SessionProvider::new(service_over(backend, Arc::new(MemoryStore::new())));
        let states = provider.subscribe();

        let watcher = tokio::spawn(async move {
            let mut nav = RecordingNavigator::default();
            RouteGuard::default().watch(states, &mut nav).await;
            nav
        });

        provider.initialize();
        tokio::time::sleep(Duration::from_millis(10)).await;
        provider.login(&Credentials::new("a@b.com", "secret")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(provider);

        let nav = watcher.await.unwrap();
        assert_eq!(nav.calls.len(), 1);
        assert!(nav.calls[0].1.replace);
    }
}
