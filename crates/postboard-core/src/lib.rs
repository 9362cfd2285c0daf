//! Core library for postboard.
//!
//! - `api`: REST client for the demo posts service
//! - `store`: origin-scoped persistent key/value storage
//! - `auth`: session service, observable session state, login form
//! - `guard`, `router`: redirecting signed-out visitors of protected views
//! - `config`: on-disk configuration and directory layout

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod router;
pub mod store;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, SessionProvider, SessionService, SessionState};
pub use config::Config;
pub use guard::{GuardOutcome, RouteGuard};
pub use router::{NavigateOptions, Navigator, Route, Router};
