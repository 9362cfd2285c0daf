use thiserror::Error;

use crate::api::ApiError;
use crate::store::StoreError;

/// Why a login did not produce a session.
///
/// The `Display` text is the user-facing message; the underlying cause is
/// only reachable through `source()` and the logs.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed. Please check your credentials.")]
    Rejected(#[source] ApiError),

    #[error("Could not save your session. Please try again.")]
    Storage(#[source] StoreError),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
