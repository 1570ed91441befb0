//! Core domain logic for Infonest: session, note synchronization and
//! editor coordination over external identity/document services.
//! This crate is the single source of truth for business invariants.

pub mod context;
pub mod editor;
pub mod logging;
pub mod model;
pub mod provider;
pub mod session;
pub mod sync;
pub mod validate;

pub use context::AppContext;
pub use editor::coordinator::{EditorCoordinator, EditorError, DEFAULT_LOAD_TIMEOUT};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::identity::Identity;
pub use model::note::{Note, NoteId};
pub use provider::identity::{AuthError, AuthErrorKind, IdentityProvider};
pub use provider::memory::{MemoryDocumentStore, MemoryIdentityProvider};
pub use provider::store::{
    DocumentStore, NoteSubscription, SnapshotEvent, StoreError, SubscriptionHandle,
    NOTES_COLLECTION,
};
pub use session::session_store::{SessionError, SessionStore};
pub use sync::engine::{NoteSyncEngine, SyncError, SyncState};
pub use sync::watch::NotesWatcher;
pub use validate::{
    validate_email, validate_note_fields, validate_password, ValidationError, MIN_PASSWORD_LEN,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
