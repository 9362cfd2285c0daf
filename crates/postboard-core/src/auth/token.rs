//! Placeholder session tokens.
//!
//! A token is base64 of `"{email}:{unix millis}"`. It is reversible and
//! carries no secret; it only marks that a login happened.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

pub fn issue(email: &str, at: DateTime<Utc>) -> String {
    STANDARD.encode(format!("{}:{}", email, at.timestamp_millis()))
}

/// Recover the email a token was issued for, if it decodes.
pub fn email_of(token: &str) -> Option<String> {
    let bytes = STANDARD.decode(token).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let (email, millis) = text.rsplit_once(':')?;
    millis.parse::<i64>().ok()?;
    Some(email.to_string())
}
