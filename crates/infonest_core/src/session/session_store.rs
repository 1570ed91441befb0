//! Session store over the identity provider.
//!
//! # Responsibility
//! - login/register/reset/sign-out use-cases with local validation
//!   performed before any provider call.
//! - In-memory identity cache; absence means "logged out".
//!
//! # Invariants
//! - A validation failure never reaches the identity provider.
//! - `register` derives the display name from the email local part.

use crate::model::identity::Identity;
use crate::provider::identity::{AuthError, IdentityProvider};
use crate::validate::{validate_email, validate_password, ValidationError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

/// Session-level failure reported to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Input rejected locally; no network call was made.
    Validation(ValidationError),
    /// The identity provider rejected the operation.
    Auth(AuthError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Auth(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AuthError> for SessionError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

/// Holds the current authenticated identity and delegates credential
/// operations to the provider.
pub struct SessionStore<P: IdentityProvider> {
    provider: Arc<P>,
    identity: Mutex<Option<Identity>>,
}

impl<P: IdentityProvider> SessionStore<P> {
    /// Creates a logged-out session over the given provider.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            identity: Mutex::new(None),
        }
    }

    /// Authenticates an existing account and caches its identity.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        validate_email(email)?;
        validate_password(password)?;

        match self.provider.sign_in(email, password).await {
            Ok(identity) => {
                info!(
                    "event=login module=session status=ok user_id={}",
                    identity.user_id
                );
                self.set_identity(identity.clone());
                Ok(identity)
            }
            Err(err) => {
                warn!("event=login module=session status=error kind={:?}", err.kind);
                Err(err.into())
            }
        }
    }

    /// Creates an account, sets its display name from the email local
    /// part, and caches the resulting identity.
    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        validate_email(email)?;
        validate_password(password)?;

        let mut identity = self.provider.sign_up(email, password).await?;
        let display_name = email_local_part(email);
        self.provider
            .set_display_name(&identity.user_id, &display_name)
            .await?;
        identity.display_name = display_name;

        info!(
            "event=register module=session status=ok user_id={}",
            identity.user_id
        );
        self.set_identity(identity.clone());
        Ok(identity)
    }

    /// Requests a password-reset email. Fire-and-forget.
    pub async fn reset_password(&self, email: &str) -> Result<(), SessionError> {
        validate_email(email)?;
        self.provider.send_password_reset(email).await?;
        info!("event=password_reset module=session status=ok");
        Ok(())
    }

    /// Ends the provider session and clears the cached identity.
    ///
    /// Callers that hold a live note subscription must cancel it before
    /// this call; `AppContext::logout` enforces that ordering.
    pub async fn sign_out(&self) {
        self.provider.sign_out().await;
        *self.identity.lock().expect("identity lock") = None;
        info!("event=logout module=session status=ok");
    }

    /// Returns the cached identity, if logged in.
    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().expect("identity lock").clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_identity().is_some()
    }

    fn set_identity(&self, identity: Identity) {
        *self.identity.lock().expect("identity lock") = Some(identity);
    }
}

/// Text before the `@`, or the whole value when there is none.
fn email_local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[cfg(test)]
mod tests {
    use super::{email_local_part, SessionError, SessionStore};
    use crate::provider::memory::MemoryIdentityProvider;
    use crate::validate::ValidationError;
    use std::sync::Arc;

    #[test]
    fn email_local_part_takes_text_before_at() {
        assert_eq!(email_local_part("alice@example.com"), "alice");
        assert_eq!(email_local_part("no-at-sign"), "no-at-sign");
    }

    #[tokio::test]
    async fn login_validation_failure_never_reaches_provider() {
        let provider = Arc::new(MemoryIdentityProvider::new());
        let session = SessionStore::new(Arc::clone(&provider));

        let blank = session.login("   ", "secret1").await;
        assert_eq!(
            blank,
            Err(SessionError::Validation(ValidationError::InvalidEmail))
        );
        let short = session.login("a@b.com", "12345").await;
        assert_eq!(
            short,
            Err(SessionError::Validation(ValidationError::PasswordTooShort))
        );
        assert_eq!(provider.auth_calls(), 0);
    }

    #[tokio::test]
    async fn register_derives_display_name_from_email() {
        let provider = Arc::new(MemoryIdentityProvider::new());
        let session = SessionStore::new(provider);

        let identity = session
            .register("carol@example.com", "secret1")
            .await
            .expect("register should succeed");
        assert_eq!(identity.display_name, "carol");
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn sign_out_clears_cached_identity() {
        let provider = Arc::new(
            MemoryIdentityProvider::new().with_account("a@b.com", "secret1", "A"),
        );
        let session = SessionStore::new(provider);
        session
            .login("a@b.com", "secret1")
            .await
            .expect("login should succeed");
        session.sign_out().await;
        assert!(session.current_identity().is_none());
    }
}
