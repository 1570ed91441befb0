//! Note sync engine.
//!
//! # Responsibility
//! - Own the single live subscription to the remote notes collection,
//!   filtered to the active user.
//! - Republish incoming snapshots as an ordered, observable note list.
//! - Route create/update/delete mutations to the remote store and let
//!   the subscription reconcile local state.
//!
//! # Invariants
//! - At most one subscription is active; switching users is
//!   cancel-then-start with no crossover window.
//! - Each snapshot replaces the observed list atomically; readers never
//!   see a partially applied snapshot or another user's notes.
//! - Mutations never patch the local list directly; the list is
//!   eventually consistent with the caller's own writes.

use crate::model::note::{Note, NoteId};
use crate::provider::store::{
    DocumentStore, SnapshotEvent, StoreError, SubscriptionHandle, NOTES_COLLECTION,
};
use crate::sync::watch::NotesWatcher;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

/// Mutation failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A mutating operation was attempted with no active identity.
    /// The store was not contacted.
    NotAuthenticated,
    /// `update_note` requires a note that already exists remotely.
    MissingNoteId,
    /// The document store rejected or failed the operation.
    Store(StoreError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "no authenticated user"),
            Self::MissingNoteId => write!(f, "note has no remote id yet"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Subscription lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// No live subscription; the observed list is empty.
    Unsubscribed,
    /// A live subscription is delivering snapshots for this user.
    Active { user_id: String },
}

struct ActiveSubscription {
    user_id: String,
    handle: SubscriptionHandle,
    pump: JoinHandle<()>,
}

impl ActiveSubscription {
    /// Fully retires this subscription: no event delivered after the
    /// cancel, no list write after the pump has been joined.
    async fn retire(self) {
        self.handle.cancel();
        self.pump.abort();
        let _ = self.pump.await;
    }
}

/// Owns the live subscription and the observed note list.
pub struct NoteSyncEngine<S: DocumentStore> {
    store: Arc<S>,
    notes_tx: watch::Sender<Vec<Note>>,
    active: Mutex<Option<ActiveSubscription>>,
}

impl<S: DocumentStore> NoteSyncEngine<S> {
    /// Creates an unsubscribed engine over the given store.
    pub fn new(store: Arc<S>) -> Self {
        let (notes_tx, _) = watch::channel(Vec::new());
        Self {
            store,
            notes_tx,
            active: Mutex::new(None),
        }
    }

    /// Opens the live query for `user_id`, first retiring any previous
    /// subscription (same or different user).
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start_sync(&self, user_id: &str) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.retire().await;
        }
        // Stale notes from a previous user must never leak across a
        // subscription switch.
        self.notes_tx.send_replace(Vec::new());

        let subscription = self.store.subscribe(NOTES_COLLECTION, user_id);
        let pump = tokio::spawn(pump_snapshots(
            user_id.to_string(),
            subscription.events,
            self.notes_tx.clone(),
        ));
        *active = Some(ActiveSubscription {
            user_id: user_id.to_string(),
            handle: subscription.handle,
            pump,
        });
        info!("event=sync_start module=sync status=ok user_id={user_id}");
    }

    /// Cancels the live query and clears the observed list.
    /// Safe to call when already unsubscribed.
    pub async fn stop_sync(&self) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            let user_id = previous.user_id.clone();
            previous.retire().await;
            info!("event=sync_stop module=sync status=ok user_id={user_id}");
        }
        self.notes_tx.send_replace(Vec::new());
    }

    /// Writes a new note owned by the active user and returns the
    /// store-assigned id. The observed list is reconciled by the next
    /// snapshot, not by this call.
    pub async fn create_note(&self, title: &str, content: &str) -> Result<NoteId, SyncError> {
        let owner_id = self.active_user().await.ok_or(SyncError::NotAuthenticated)?;
        let note = Note::new(owner_id, title, content);
        let id = self.store.add(NOTES_COLLECTION, &note).await?;
        Ok(id)
    }

    /// Fully overwrites the remote record (last-writer-wins), stamping
    /// a fresh `updated_at`.
    pub async fn update_note(&self, mut note: Note) -> Result<(), SyncError> {
        if self.active_user().await.is_none() {
            return Err(SyncError::NotAuthenticated);
        }
        if !note.is_persisted() {
            return Err(SyncError::MissingNoteId);
        }
        note.touch();
        let id = note.id.clone();
        self.store.set(NOTES_COLLECTION, &id, &note).await?;
        Ok(())
    }

    /// Removes the remote record. Deleting a missing id is a success.
    pub async fn delete_note(&self, note_id: &str) -> Result<(), SyncError> {
        if self.active_user().await.is_none() {
            return Err(SyncError::NotAuthenticated);
        }
        self.store.delete(NOTES_COLLECTION, note_id).await?;
        Ok(())
    }

    /// Returns a read-only view of the observed note list.
    pub fn watch(&self) -> NotesWatcher {
        NotesWatcher::new(self.notes_tx.subscribe())
    }

    /// Returns the current subscription lifecycle state.
    pub async fn state(&self) -> SyncState {
        match self.active.lock().await.as_ref() {
            Some(active) => SyncState::Active {
                user_id: active.user_id.clone(),
            },
            None => SyncState::Unsubscribed,
        }
    }

    async fn active_user(&self) -> Option<String> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|active| active.user_id.clone())
    }
}

/// Forwards subscription events into the observed list until the
/// channel closes or the task is aborted during retirement.
async fn pump_snapshots(
    user_id: String,
    mut events: mpsc::UnboundedReceiver<SnapshotEvent>,
    notes_tx: watch::Sender<Vec<Note>>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SnapshotEvent::Snapshot(mut notes) => {
                notes.sort_by(|a, b| {
                    b.updated_at
                        .cmp(&a.updated_at)
                        .then_with(|| a.id.cmp(&b.id))
                });
                notes_tx.send_replace(notes);
            }
            SnapshotEvent::Error(err) => {
                // Known limitation: no automatic resubscribe. The last
                // good snapshot stays visible.
                warn!("event=snapshot_error module=sync status=error user_id={user_id} error={err}");
            }
        }
    }
}
