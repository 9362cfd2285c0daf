//! API client for the demo REST service.
//!
//! This module provides the `ApiClient` struct: a thin generic JSON client
//! (`get` / `post`) plus the handful of endpoints the application uses.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{Post, User};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Public demo API used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum concurrent author lookups for the dashboard.
const MAX_CONCURRENT_REQUESTS: usize = 5;

/// API client for the demo service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request, retrying with exponential backoff while rate limited.
    async fn execute<T, F>(&self, url: &str, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self.authorize(build()).send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.text().await?;
                if body.trim().is_empty() {
                    return Err(ApiError::EmptyResponse(status));
                }
                return serde_json::from_str(&body).map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse JSON from {}: {}", url, e))
                });
            }

            if status.as_u16() == 429 {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimited);
                }
                warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2; // Exponential backoff
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        self.execute(&url, || self.client.get(&url)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        self.execute(&url, || self.client.post(&url).json(body)).await
    }

    // ===== Data Fetching Methods =====

    /// Fetch all posts
    pub async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.get("/posts").await
    }

    /// Fetch a single user profile
    pub async fn fetch_user(&self, user_id: i64) -> Result<User, ApiError> {
        self.get(&format!("/users/{}", user_id)).await
    }

    /// Fetch the authors of the given posts, one request per distinct user.
    /// Failed lookups are logged and left out of the result.
    pub async fn fetch_authors(&self, posts: &[Post]) -> Vec<User> {
        let ids = author_ids(posts);

        stream::iter(ids)
            .map(|id| async move { (id, self.fetch_user(id).await) })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .filter_map(|(id, result)| async move {
                match result {
                    Ok(user) => Some(user),
                    Err(e) => {
                        warn!(user_id = id, error = %e, "Failed to fetch author");
                        None
                    }
                }
            })
            .collect()
            .await
    }
}

/// Distinct author ids in first-seen order
fn author_ids(posts: &[Post]) -> Vec<i64> {
    let mut ids: Vec<i64> = Vec::new();
    for post in posts {
        if !ids.contains(&post.user_id) {
            ids.push(post.user_id);
        }
    }
    ids
}
