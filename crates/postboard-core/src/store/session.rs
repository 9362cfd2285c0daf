use std::sync::Arc;

use crate::models::StoredSession;

use super::{KeyValueStore, StoreError};

/// Key holding the JSON-encoded session record
pub const SESSION_KEY: &str = "session";

/// Typed view over the session record in a `KeyValueStore`.
/// Clone is cheap - the backing store is shared.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load the session record, if one was saved.
    pub fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        let Some(raw) = self.backend.get(SESSION_KEY)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                key: SESSION_KEY.to_string(),
                source,
            })
    }

    /// Token and user are written in one value, so they never disagree.
    pub fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(session)?;
        self.backend.set(SESSION_KEY, &encoded)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(SESSION_KEY)
    }

    pub fn has_session(&self) -> bool {
        matches!(self.backend.get(SESSION_KEY), Ok(Some(_)))
    }
}
