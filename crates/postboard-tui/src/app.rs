//! Application state management for Postboard.
//!
//! This module contains the core `App` struct that manages all application
//! state: routing, the login form, dashboard data, and background task
//! coordination. The session itself lives in the `SessionProvider` the
//! application root hands to `App::new`.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use postboard_core::api::ApiClient;
use postboard_core::auth::{AuthError, LoginForm, SessionProvider, SessionState};
use postboard_core::config::Config;
use postboard_core::guard::{GuardOutcome, RouteGuard};
use postboard_core::models::{Post, User};
use postboard_core::router::{Route, Router};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Number of posts shown on the dashboard.
pub const DASHBOARD_POST_LIMIT: usize = 10;

/// Environment variables that prefill the login form
pub const EMAIL_ENV: &str = "POSTBOARD_EMAIL";
pub const PASSWORD_ENV: &str = "POSTBOARD_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Posts and authors shown on the dashboard
#[derive(Debug, Default)]
pub struct Dashboard {
    pub posts: Vec<Post>,
    pub authors: HashMap<i64, User>,
    /// Cursor in the post list
    pub selection: usize,
    /// Post whose detail is open
    pub selected_post: Option<i64>,
    pub loading: bool,
    pub authors_loaded: bool,
    pub error: Option<String>,
}

impl Dashboard {
    pub fn selected(&self) -> Option<&Post> {
        self.selected_post
            .and_then(|id| self.posts.iter().find(|p| p.id == id))
    }

    pub fn author_of(&self, post: &Post) -> Option<&User> {
        self.authors.get(&post.user_id)
    }

    /// Author name for the list, "Loading..." until lookups finish
    pub fn author_label(&self, post: &Post) -> &str {
        match self.author_of(post) {
            Some(user) => &user.name,
            None if self.authors_loaded => "Unknown",
            None => "Loading...",
        }
    }

    pub fn select_next(&mut self) {
        if self.selection + 1 < self.posts.len() {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn open_selected(&mut self) {
        self.selected_post = self.posts.get(self.selection).map(|p| p.id);
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from the dashboard fetch task back to the main loop.
enum DashboardMessage {
    /// First page of posts
    Posts(Vec<Post>),
    /// Authors that could be fetched
    Authors(Vec<User>),
    /// Post list could not be loaded
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionProvider,
    pub api: ApiClient,
    pub router: Router,

    // UI State
    pub state: AppState,
    pub status_message: Option<String>,

    // Guard for the mounted protected route, if any
    guard: Option<RouteGuard>,
    mounted_route: Option<Route>,

    // Login form state
    pub login_form: LoginForm,
    pub login_focus: LoginFocus,
    login_task: Option<JoinHandle<Result<User, AuthError>>>,

    // Dashboard state
    pub dashboard: Dashboard,
    dashboard_rx: mpsc::Receiver<DashboardMessage>,
    dashboard_tx: mpsc::Sender<DashboardMessage>,
}

impl App {
    /// Create the application around an already initialized session.
    pub fn new(config: Config, session: SessionProvider, mut api: ApiClient) -> Self {
        api.set_token(session.token());

        let email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let password = std::env::var(PASSWORD_ENV).unwrap_or_default();

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let mut app = Self {
            config,
            session,
            api,
            router: Router::default(),

            state: AppState::Normal,
            status_message: None,

            guard: None,
            mounted_route: None,

            login_form: LoginForm::new(email, password),
            login_focus: LoginFocus::Email,
            login_task: None,

            dashboard: Dashboard::default(),
            dashboard_rx: rx,
            dashboard_tx: tx,
        };
        app.sync_route();
        app
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn current_route(&self) -> &Route {
        self.router.current()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn navigate(&mut self, route: Route) {
        self.router.push(route);
        self.sync_route();
    }

    pub fn go_back(&mut self) {
        if self.router.back() {
            self.sync_route();
        }
    }

    /// Run mount logic when the current route differs from the mounted one.
    fn sync_route(&mut self) {
        let current = self.router.current().clone();
        if self.mounted_route.as_ref() == Some(&current) {
            return;
        }
        debug!(route = current.path(), "Mounting route");

        self.guard = current.is_protected().then(RouteGuard::default);

        match current {
            Route::Login => {
                self.login_form.errors = Default::default();
                self.login_focus = if self.login_form.email.is_empty() {
                    LoginFocus::Email
                } else {
                    LoginFocus::Password
                };
            }
            Route::Dashboard => {
                if self.session.is_authenticated()
                    && self.dashboard.posts.is_empty()
                    && !self.dashboard.loading
                {
                    self.load_dashboard();
                }
            }
            Route::Home | Route::NotFound(_) => {}
        }

        self.mounted_route = Some(current);
        self.run_guard();
    }

    fn run_guard(&mut self) {
        let state = self.session.state();
        let outcome = match self.guard.as_mut() {
            Some(guard) => guard.check(&state, &mut self.router),
            None => return,
        };
        if outcome == GuardOutcome::Redirected {
            self.sync_route();
        }
    }

    /// Primary action on the home page
    pub fn home_action(&mut self) {
        if self.session.is_authenticated() {
            self.navigate(Route::Dashboard);
        } else {
            self.navigate(Route::Login);
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn login_in_progress(&self) -> bool {
        self.login_task.is_some()
    }

    /// Validate the login form and start signing in
    pub fn submit_login(&mut self) {
        if self.login_in_progress() {
            return;
        }

        let credentials = match self.login_form.validate() {
            Ok(credentials) => credentials,
            Err(errors) => {
                debug!(?errors, "Login form invalid");
                self.login_focus = if errors.email.is_some() {
                    LoginFocus::Email
                } else {
                    LoginFocus::Password
                };
                return;
            }
        };

        let session = self.session.clone();
        self.login_task = Some(tokio::spawn(async move { session.login(&credentials).await }));
    }

    async fn finish_login(&mut self) {
        let Some(task) = self.login_task.take() else {
            return;
        };

        match task.await {
            Ok(Ok(user)) => {
                self.api.set_token(self.session.token());
                self.config.last_email = Some(user.email.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }
                self.login_form.clear_password();
                self.status_message = Some(format!("Signed in as {}", user.name));
                self.navigate(Route::Dashboard);
            }
            Ok(Err(e)) => {
                // The provider already published the message for the form
                debug!(error = %e, "Login rejected");
            }
            Err(e) => {
                error!(error = %e, "Login task failed");
                self.status_message = Some("Login failed unexpectedly".to_string());
            }
        }
    }

    pub fn logout(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        self.session.logout();
        self.api.set_token(None);
        self.dashboard = Dashboard::default();
        self.status_message = Some("Signed out".to_string());
        info!("User signed out");
        self.navigate(Route::Home);
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Fetch posts, then their authors, in the background
    pub fn load_dashboard(&mut self) {
        self.dashboard = Dashboard {
            loading: true,
            ..Dashboard::default()
        };

        let api = self.api.clone();
        let tx = self.dashboard_tx.clone();
        tokio::spawn(async move {
            let posts = match api.fetch_posts().await {
                Ok(mut posts) => {
                    posts.truncate(DASHBOARD_POST_LIMIT);
                    posts
                }
                Err(e) => {
                    error!(error = %e, "Error fetching posts");
                    let _ = tx
                        .send(DashboardMessage::Error("Failed to load posts. Please try again.".to_string()))
                        .await;
                    return;
                }
            };

            // Posts are shown first; author names fill in when their lookups finish
            if tx.send(DashboardMessage::Posts(posts.clone())).await.is_err() {
                return;
            }
            let authors = api.fetch_authors(&posts).await;
            let _ = tx.send(DashboardMessage::Authors(authors)).await;
        });
    }

    fn process_dashboard_message(&mut self, message: DashboardMessage) {
        match message {
            DashboardMessage::Posts(posts) => {
                debug!(count = posts.len(), "Posts loaded");
                self.dashboard.posts = posts;
                self.dashboard.loading = false;
                self.dashboard.selection = 0;
            }
            DashboardMessage::Authors(authors) => {
                debug!(count = authors.len(), "Authors loaded");
                self.dashboard.authors = authors.into_iter().map(|u| (u.id, u)).collect();
                self.dashboard.authors_loaded = true;
            }
            DashboardMessage::Error(message) => {
                self.dashboard.error = Some(message);
                self.dashboard.loading = false;
            }
        }
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    /// Apply finished background work and re-run the route guard
    pub async fn check_background_tasks(&mut self) {
        if self.login_task.as_ref().is_some_and(|t| t.is_finished()) {
            self.finish_login().await;
        }

        while let Ok(message) = self.dashboard_rx.try_recv() {
            self.process_dashboard_message(message);
        }

        self.sync_route();
        self.run_guard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use postboard_core::auth::SessionService;
    use postboard_core::store::{MemoryStore, SessionStore};

    /// Signed-out app over in-memory storage. Nothing here reaches the network.
    fn signed_out_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        let session = SessionProvider::new(SessionService::new(Arc::new(api.clone()), store));
        session.initialize();
        App::new(Config::default(), session, api)
    }

    fn post(id: i64, user_id: i64) -> Post {
        Post {
            id,
            user_id,
            title: format!("Post {}", id),
            body: "body".to_string(),
        }
    }

    #[test]
    fn test_login_focus_cycle() {
        assert_eq!(LoginFocus::Email.next(), LoginFocus::Password);
        assert_eq!(LoginFocus::Button.next(), LoginFocus::Email);
        assert_eq!(LoginFocus::Email.prev(), LoginFocus::Button);
        assert_eq!(LoginFocus::Password.prev(), LoginFocus::Email);
    }

    #[test]
    fn test_dashboard_selection() {
        let mut dashboard = Dashboard {
            posts: vec![post(1, 1), post(2, 1), post(3, 2)],
            ..Dashboard::default()
        };
        dashboard.select_prev();
        assert_eq!(dashboard.selection, 0);
        dashboard.select_next();
        dashboard.select_next();
        dashboard.select_next();
        assert_eq!(dashboard.selection, 2);

        assert!(dashboard.selected().is_none());
        dashboard.open_selected();
        assert_eq!(dashboard.selected().map(|p| p.id), Some(3));
    }

    #[test]
    fn test_author_label() {
        let mut dashboard = Dashboard {
            posts: vec![post(1, 1), post(2, 2)],
            ..Dashboard::default()
        };
        let first = dashboard.posts[0].clone();
        let second = dashboard.posts[1].clone();
        assert_eq!(dashboard.author_label(&first), "Loading...");

        dashboard.authors.insert(1, User::from_email(Some(1), "leanne@april.biz"));
        dashboard.authors_loaded = true;
        assert_eq!(dashboard.author_label(&first), "leanne");
        assert_eq!(dashboard.author_label(&second), "Unknown");
    }

    #[test]
    fn test_signed_out_dashboard_redirects_to_login() {
        let mut app = signed_out_app();
        app.navigate(Route::Dashboard);
        assert_eq!(*app.current_route(), Route::Login);
        assert!(!app.dashboard.loading);

        // The redirect replaced the dashboard entry
        app.go_back();
        assert_eq!(*app.current_route(), Route::Home);
    }

    #[test]
    fn test_home_action_signed_out() {
        let mut app = signed_out_app();
        app.home_action();
        assert_eq!(*app.current_route(), Route::Login);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let mut app = signed_out_app();
        app.navigate(Route::parse("/missing"));
        assert_eq!(*app.current_route(), Route::NotFound("/missing".to_string()));
    }

    #[test]
    fn test_invalid_form_does_not_start_login() {
        let mut app = signed_out_app();
        app.navigate(Route::Login);
        app.login_form = LoginForm::new("not-an-email", "123");
        app.submit_login();
        assert!(!app.login_in_progress());
        assert_eq!(app.login_focus, LoginFocus::Email);
        assert_eq!(app.login_form.errors.email.as_deref(), Some("Email is invalid"));
    }

    #[test]
    fn test_posts_show_before_authors_arrive() {
        let mut app = signed_out_app();
        app.dashboard.loading = true;

        app.process_dashboard_message(DashboardMessage::Posts(vec![post(1, 1), post(2, 2)]));
        assert!(!app.dashboard.loading);
        let first = app.dashboard.posts[0].clone();
        let second = app.dashboard.posts[1].clone();
        assert_eq!(app.dashboard.author_label(&first), "Loading...");

        app.process_dashboard_message(DashboardMessage::Authors(vec![User::from_email(
            Some(1),
            "leanne@april.biz",
        )]));
        assert_eq!(app.dashboard.author_label(&first), "leanne");
        assert_eq!(app.dashboard.author_label(&second), "Unknown");
    }
}
