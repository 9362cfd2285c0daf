//! Fakes shared by the auth, provider and guard tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::ApiError;
use crate::models::{Credentials, RegisteredUser};
use crate::store::{MemoryStore, SessionStore};

use super::{IdentityBackend, SessionService};

pub struct FakeBackend {
    id: Option<i64>,
    fail: AtomicBool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn ok(id: Option<i64>) -> Self {
        Self {
            id,
            fail: AtomicBool::new(false),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let backend = Self::ok(None);
        backend.set_failing(true);
        backend
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityBackend for FakeBackend {
    async fn register(&self, _credentials: &Credentials) -> Result<RegisteredUser, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::ServerError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "simulated outage".to_string(),
            });
        }
        Ok(RegisteredUser { id: self.id })
    }
}

/// Service over a fresh in-memory store; the store is returned for inspection.
pub fn service_with(backend: FakeBackend) -> (SessionService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = service_over(Arc::new(backend), store.clone());
    (service, store)
}

/// Service over an existing backend and store, for tests that keep handles to both.
pub fn service_over(backend: Arc<FakeBackend>, store: Arc<MemoryStore>) -> SessionService {
    SessionService::new(backend, SessionStore::new(store))
}
