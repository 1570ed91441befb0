//! Identity provider contract.
//!
//! # Responsibility
//! - Define sign-in/sign-up/reset/sign-out operations consumed from the
//!   external identity service.
//! - Normalize provider-specific failures into a small closed error set.

use crate::model::identity::Identity;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Closed set of authentication failure causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Email/password pair was rejected.
    InvalidCredentials,
    /// Account does not exist or has been disabled.
    UnknownOrDisabledUser,
    /// Provider rejected the password as too weak on sign-up.
    WeakPassword,
    /// Another account already uses this email.
    EmailAlreadyInUse,
    /// Any other provider failure (network, quota, internal).
    Provider,
}

/// Authentication failure with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Generic provider failure.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Provider, message)
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            AuthErrorKind::InvalidCredentials => {
                write!(f, "invalid email or password: {}", self.message)
            }
            AuthErrorKind::UnknownOrDisabledUser => {
                write!(f, "user does not exist or is disabled: {}", self.message)
            }
            AuthErrorKind::WeakPassword => write!(f, "weak password: {}", self.message),
            AuthErrorKind::EmailAlreadyInUse => {
                write!(f, "email already in use: {}", self.message)
            }
            AuthErrorKind::Provider => write!(f, "identity provider error: {}", self.message),
        }
    }
}

impl Error for AuthError {}

/// Contract for the external identity service.
///
/// Implementations are expected to be cheap to share (`Arc`) and safe
/// to call from any task.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider: Send + Sync {
    /// Authenticates an existing account.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Creates a new account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Sets the display name on an existing account profile.
    async fn set_display_name(&self, user_id: &str, name: &str) -> Result<(), AuthError>;

    /// Requests a password-reset email. Fire-and-forget: success only
    /// means the provider accepted the request.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Ends the provider-side session.
    async fn sign_out(&self);

    /// Returns the provider's notion of the signed-in user, if any.
    fn current_user_id(&self) -> Option<String>;
}
