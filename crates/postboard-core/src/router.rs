//! Client-side routes and navigation history.

use tracing::debug;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Dashboard,
    NotFound(String),
}

impl Route {
    /// Resolve a path. Trailing slashes and query strings are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            LOGIN_PATH => Route::Login,
            DASHBOARD_PATH => Route::Dashboard,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Home => HOME_PATH,
            Route::Login => LOGIN_PATH,
            Route::Dashboard => DASHBOARD_PATH,
            Route::NotFound(path) => path,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::NotFound(_) => "Not Found",
        }
    }

    /// Routes that require a session
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one
    pub replace: bool,
}

impl NavigateOptions {
    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// Anything that can move the application to another route.
pub trait Navigator {
    fn navigate(&mut self, path: &str, options: NavigateOptions);
}

/// History stack of visited routes. Never empty.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            history: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // history is never empty: new() seeds it and back() keeps the first entry
        &self.history[self.history.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        if self.current() != &route {
            debug!(to = route.path(), "Navigate (push)");
            self.history.push(route);
        }
    }

    pub fn replace(&mut self, route: Route) {
        debug!(to = route.path(), "Navigate (replace)");
        if let Some(last) = self.history.last_mut() {
            *last = route;
        }
    }

    /// Go back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for Router {
    fn navigate(&mut self, path: &str, options: NavigateOptions) {
        let route = Route::parse(path);
        if options.replace {
            self.replace(route);
        } else {
            self.push(route);
        }
    }
}
