//! Authentication module: the demo sign-in and the observable session.
//!
//! This module provides:
//! - `SessionService`: login/logout/current-user against the identity
//!   backend and the persistent session store
//! - `SessionProvider`: the application-wide session state that the UI
//!   watches, with `login()` / `logout()`
//! - `LoginForm`: client-side validation of the login fields
//!
//! There is no real credential check. Any email/password pair the backend
//! accepts becomes a session, and the token is a cosmetic placeholder.

pub mod backend;
pub mod error;
pub mod form;
pub mod provider;
pub mod service;
pub mod token;

pub use backend::IdentityBackend;
pub use error::AuthError;
pub use form::{FormErrors, LoginForm};
pub use provider::{SessionPhase, SessionProvider, SessionState};
pub use service::SessionService;

#[cfg(test)]
pub(crate) mod testing;
