use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// 4xx other than 404 and 429: the service refused what we sent
    #[error("Request rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    ServerError { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// A success status with nothing to decode, e.g. 201 or 204 without a body
    #[error("Empty response ({0})")]
    EmptyResponse(StatusCode),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Map a non-success status and its body
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = truncate_body(body);
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(body),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
            s if s.is_client_error() => ApiError::Rejected { status, body },
            s if s.is_server_error() => ApiError::ServerError { status, body },
            _ => ApiError::InvalidResponse(format!("Unexpected status {}: {}", status, body)),
        }
    }
}

/// Keep error bodies short enough to log, cutting on a char boundary
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes)", &body[..end], body.len())
}
