//! Read-only view of the observed note list.

use crate::model::note::Note;
use tokio::sync::watch;

/// Push-updated, read-only view of the engine's note list.
///
/// Each clone tracks change notifications independently; `current`
/// always returns the latest complete snapshot.
#[derive(Clone)]
pub struct NotesWatcher {
    rx: watch::Receiver<Vec<Note>>,
}

impl NotesWatcher {
    pub(crate) fn new(rx: watch::Receiver<Vec<Note>>) -> Self {
        Self { rx }
    }

    /// Returns the latest snapshot of the note list.
    pub fn current(&self) -> Vec<Note> {
        self.rx.borrow().clone()
    }

    /// Looks up one note by id in the latest snapshot.
    pub fn find(&self, note_id: &str) -> Option<Note> {
        self.rx
            .borrow()
            .iter()
            .find(|note| note.id == note_id)
            .cloned()
    }

    /// Waits until the list is replaced by a newer snapshot.
    ///
    /// Returns `false` when the owning engine has been dropped and no
    /// further changes can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
