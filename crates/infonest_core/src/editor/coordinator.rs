//! Editor coordinator.
//!
//! # Responsibility
//! - Resolve a single note by id from the observed list, waiting for
//!   the first snapshot when the editor opens before the list loads.
//! - Validate editor input and dispatch create/update/delete through
//!   the sync engine.
//!
//! # Invariants
//! - The wait for a note is bounded; an unknown id fails with
//!   `NoteNotFound` instead of hanging.
//! - Saving an existing note preserves its `owner_id` as observed in
//!   the list; the client never rewrites ownership.

use crate::model::note::{Note, NoteId};
use crate::provider::store::DocumentStore;
use crate::sync::engine::{NoteSyncEngine, SyncError};
use crate::validate::{validate_note_fields, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Upper bound on waiting for a note to appear in the observed list.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Editor-level failure reported to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Blank title or content; detected locally before any network call.
    Validation(ValidationError),
    /// The note never appeared in the observed list within the bound.
    NoteNotFound(NoteId),
    /// The sync engine rejected or failed the operation.
    Sync(SyncError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Sync(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Sync(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for EditorError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SyncError> for EditorError {
    fn from(value: SyncError) -> Self {
        Self::Sync(value)
    }
}

/// Per-screen coordinator borrowing the session's sync engine.
pub struct EditorCoordinator<'engine, S: DocumentStore> {
    engine: &'engine NoteSyncEngine<S>,
    load_timeout: Duration,
}

impl<'engine, S: DocumentStore> EditorCoordinator<'engine, S> {
    pub fn new(engine: &'engine NoteSyncEngine<S>) -> Self {
        Self {
            engine,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Overrides the bounded wait used by `load_for_edit`.
    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    /// Returns the note with the given id, waiting (bounded) for it to
    /// appear in the observed list.
    pub async fn load_for_edit(&self, note_id: &str) -> Result<Note, EditorError> {
        let mut watcher = self.engine.watch();
        let wait = async {
            loop {
                if let Some(note) = watcher.find(note_id) {
                    return Some(note);
                }
                if !watcher.changed().await {
                    return None;
                }
            }
        };
        match tokio::time::timeout(self.load_timeout, wait).await {
            Ok(Some(note)) => Ok(note),
            _ => Err(EditorError::NoteNotFound(note_id.to_string())),
        }
    }

    /// Creates a new note (`note_id` = `None`) or fully updates an
    /// existing one, after trimming and validating both fields.
    pub async fn save(
        &self,
        note_id: Option<&str>,
        title: &str,
        content: &str,
    ) -> Result<NoteId, EditorError> {
        let title = title.trim();
        let content = content.trim();
        validate_note_fields(title, content)?;

        match note_id {
            None => Ok(self.engine.create_note(title, content).await?),
            Some(id) => {
                let mut note = self
                    .engine
                    .watch()
                    .find(id)
                    .ok_or_else(|| EditorError::NoteNotFound(id.to_string()))?;
                note.title = title.to_string();
                note.content = content.to_string();
                self.engine.update_note(note).await?;
                Ok(id.to_string())
            }
        }
    }

    /// Removes the note remotely. Idempotent via the store contract.
    pub async fn delete(&self, note_id: &str) -> Result<(), EditorError> {
        self.engine.delete_note(note_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorCoordinator, EditorError};
    use crate::provider::memory::MemoryDocumentStore;
    use crate::sync::engine::NoteSyncEngine;
    use crate::validate::ValidationError;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn save_rejects_blank_fields_before_any_network_call() {
        let store = Arc::new(MemoryDocumentStore::new());
        let engine = NoteSyncEngine::new(Arc::clone(&store));
        engine.start_sync("u1").await;
        let editor = EditorCoordinator::new(&engine);

        let result = editor.save(None, "  ", "body").await;
        assert_eq!(
            result,
            Err(EditorError::Validation(ValidationError::BlankTitle))
        );
        assert_eq!(store.mutation_count(), 0);
    }

    #[tokio::test]
    async fn load_for_edit_times_out_on_unknown_id() {
        let engine = NoteSyncEngine::new(Arc::new(MemoryDocumentStore::new()));
        engine.start_sync("u1").await;
        let editor =
            EditorCoordinator::new(&engine).with_load_timeout(Duration::from_millis(50));

        let result = editor.load_for_edit("missing").await;
        assert_eq!(result, Err(EditorError::NoteNotFound("missing".to_string())));
    }
}
