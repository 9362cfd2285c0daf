//! REST API client module for the demo posts service.
//!
//! This module provides the `ApiClient` for talking to a
//! JSONPlaceholder-style API: posts and users for the dashboard, and the
//! `POST /users` call the mocked sign-in goes through.
//!
//! The base URL is configurable; requests carry a bearer token once a
//! session exists, although the demo API ignores it.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
