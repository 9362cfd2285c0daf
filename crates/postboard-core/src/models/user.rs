use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback id when the backend does not echo one.
pub const DEFAULT_USER_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl User {
    /// Build the local user record for a freshly signed-in email address.
    /// The display name is the part before `@`.
    pub fn from_email(id: Option<i64>, email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: id.unwrap_or(DEFAULT_USER_ID),
            name,
            email: email.to_string(),
            username: None,
        }
    }
}

/// Login input. Never persisted.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response from the identity backend when a login is registered.
/// The demo API answers with whatever it created; only `id` matters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisteredUser {
    #[serde(default)]
    pub id: Option<i64>,
}

/// The persisted session: token and user travel together under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: String, user: User) -> Self {
        Self {
            token,
            user,
            created_at: Utc::now(),
        }
    }
}
