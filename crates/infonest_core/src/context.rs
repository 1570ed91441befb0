//! Session/sync application context.
//!
//! # Responsibility
//! - Tie the session store and the sync engine into one explicitly
//!   constructed object that is passed down to presentation code.
//! - Enforce the cross-component lifecycle: a successful login starts
//!   the subscription; logout cancels it before the provider sign-out.
//!
//! # Invariants
//! - The subscription is cancelled before provider sign-out, so no
//!   orphaned listener can surface a permission-denied error.

use crate::editor::coordinator::EditorCoordinator;
use crate::model::identity::Identity;
use crate::provider::identity::IdentityProvider;
use crate::provider::store::DocumentStore;
use crate::session::session_store::{SessionError, SessionStore};
use crate::sync::engine::NoteSyncEngine;
use crate::sync::watch::NotesWatcher;
use std::sync::Arc;

/// One user-facing application session: authentication plus the live
/// note list. Constructed once and passed down, never global.
pub struct AppContext<P: IdentityProvider, S: DocumentStore> {
    session: SessionStore<P>,
    engine: NoteSyncEngine<S>,
}

impl<P: IdentityProvider, S: DocumentStore> AppContext<P, S> {
    /// Builds a logged-out context over the two external services.
    pub fn new(provider: Arc<P>, store: Arc<S>) -> Self {
        Self {
            session: SessionStore::new(provider),
            engine: NoteSyncEngine::new(store),
        }
    }

    /// Authenticates and, on success, opens the note subscription for
    /// the new identity.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let identity = self.session.login(email, password).await?;
        self.engine.start_sync(&identity.user_id).await;
        Ok(identity)
    }

    /// Registers a new account and opens its note subscription.
    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let identity = self.session.register(email, password).await?;
        self.engine.start_sync(&identity.user_id).await;
        Ok(identity)
    }

    /// Requests a password-reset email.
    pub async fn reset_password(&self, email: &str) -> Result<(), SessionError> {
        self.session.reset_password(email).await
    }

    /// Ends the session. The subscription is cancelled first, then the
    /// provider session.
    pub async fn logout(&self) {
        self.engine.stop_sync().await;
        self.session.sign_out().await;
    }

    /// Returns the cached identity, if logged in.
    pub fn current_identity(&self) -> Option<Identity> {
        self.session.current_identity()
    }

    /// Read-only view of the observed note list.
    pub fn notes(&self) -> NotesWatcher {
        self.engine.watch()
    }

    /// The sync engine, for direct note mutations.
    pub fn sync(&self) -> &NoteSyncEngine<S> {
        &self.engine
    }

    /// A coordinator for one editor screen.
    pub fn editor(&self) -> EditorCoordinator<'_, S> {
        EditorCoordinator::new(&self.engine)
    }
}
