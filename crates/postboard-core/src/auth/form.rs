//! Login form state and validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Credentials;

/// Maximum length for email input.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub errors: FormErrors,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            errors: FormErrors::default(),
        }
    }

    /// Check the fields, remember the messages, and hand back credentials
    /// when everything passes.
    pub fn validate(&mut self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::default();

        if self.email.is_empty() {
            errors.email = Some("Email is required".to_string());
        } else if !email_pattern().is_match(&self.email) {
            errors.email = Some("Email is invalid".to_string());
        }

        if self.password.is_empty() {
            errors.password = Some("Password is required".to_string());
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.password = Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }

        self.errors = errors.clone();
        if errors.is_empty() {
            Ok(Credentials::new(self.email.clone(), self.password.clone()))
        } else {
            Err(errors)
        }
    }

    pub fn push_email_char(&mut self, c: char) {
        if can_add_char(self.email.chars().count(), MAX_EMAIL_LENGTH, c) {
            self.email.push(c);
        }
    }

    pub fn push_password_char(&mut self, c: char) {
        if can_add_char(self.password.chars().count(), MAX_PASSWORD_LENGTH, c) {
            self.password.push(c);
        }
    }

    pub fn clear_password(&mut self) {
        self.password.clear();
    }
}

/// Characters allowed in login fields (printable ASCII excluding control characters)
fn is_valid_input_char(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_control()
}

fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}
