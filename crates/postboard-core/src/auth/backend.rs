use async_trait::async_trait;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::models::{Credentials, RegisteredUser};

/// Path the demo sign-in posts credentials to
const REGISTER_PATH: &str = "/users";

/// The remote half of a login. The demo API has no auth endpoint, so a
/// login is a creation-style request whose only useful output is an id.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<RegisteredUser, ApiError>;
}

#[async_trait]
impl IdentityBackend for ApiClient {
    async fn register(&self, credentials: &Credentials) -> Result<RegisteredUser, ApiError> {
        match self.post(REGISTER_PATH, credentials).await {
            // Accepted without a body: no id to report
            Err(ApiError::EmptyResponse(status)) => {
                debug!(%status, "Sign-in accepted without a body");
                Ok(RegisteredUser::default())
            }
            other => other,
        }
    }
}
