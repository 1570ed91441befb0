//! Local form validation.
//!
//! # Responsibility
//! - Reject bad credentials and blank note fields before any network
//!   call is made.
//!
//! # Invariants
//! - A validation failure never reaches the identity provider or the
//!   document store.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Passwords must be strictly longer than this many characters.
pub const MIN_PASSWORD_LEN: usize = 5;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Locally detected input problem. Never crosses to the network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Email is blank or does not look like an address.
    InvalidEmail,
    /// Password is too short.
    PasswordTooShort,
    /// Note title is blank after trimming.
    BlankTitle,
    /// Note content is blank after trimming.
    BlankContent,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is invalid"),
            Self::PasswordTooShort => write!(
                f,
                "password must be longer than {MIN_PASSWORD_LEN} characters"
            ),
            Self::BlankTitle => write!(f, "note title must not be blank"),
            Self::BlankContent => write!(f, "note content must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Validates an email field.
///
/// Anything without an `@` passes as long as it is non-blank; once an
/// `@` is present the whole value must match the address pattern.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidEmail);
    }
    if trimmed.contains('@') && !EMAIL_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validates a password field against the minimum length rule.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() > MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ValidationError::PasswordTooShort)
    }
}

/// Validates note editor fields, trimming both before the check.
pub fn validate_note_fields(title: &str, content: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    if content.trim().is_empty() {
        return Err(ValidationError::BlankContent);
    }
    Ok(())
}
