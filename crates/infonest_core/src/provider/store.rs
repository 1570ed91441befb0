//! Remote document store contract.
//!
//! # Responsibility
//! - Define the add/set/delete primitives and the live-subscription
//!   handle consumed from the external document store.
//!
//! # Invariants
//! - `subscribe` filters server-side by owner; subscribers never see
//!   another user's records.
//! - After `SubscriptionHandle::cancel()` returns, no further events
//!   are delivered on that subscription's channel.

use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;

/// Collection name holding all note documents.
pub const NOTES_COLLECTION: &str = "notes";

/// Document store failure surfaced to mutating callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store rejected the operation for the current credentials.
    PermissionDenied(String),
    /// The store could not be reached.
    Unavailable(String),
    /// Any other backend failure.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(message) => write!(f, "store permission denied: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::Backend(message) => write!(f, "store backend error: {message}"),
        }
    }
}

impl Error for StoreError {}

/// One delivery on a live subscription.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// Complete result set at one point in time. Replaces any prior
    /// snapshot wholesale.
    Snapshot(Vec<Note>),
    /// Delivery failure. The previous snapshot stays valid.
    Error(StoreError),
}

/// Cancellable registration for one live query.
///
/// Owned by exactly one entity; cancelling closes the event channel.
pub struct SubscriptionHandle {
    cancel: Box<dyn FnOnce() + Send>,
}

impl SubscriptionHandle {
    /// Wraps a backend-specific cancellation action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Detaches the listener. Idempotent from the caller's point of
    /// view: the handle is consumed.
    pub fn cancel(self) {
        (self.cancel)();
    }
}

/// Live query registration: the cancel handle plus the event stream.
pub struct NoteSubscription {
    /// Cancel handle for this registration.
    pub handle: SubscriptionHandle,
    /// Snapshot/error deliveries, in order.
    pub events: mpsc::UnboundedReceiver<SnapshotEvent>,
}

/// Contract for the external document store.
#[allow(async_fn_in_trait)]
pub trait DocumentStore: Send + Sync {
    /// Persists a new record and returns the store-assigned id.
    async fn add(&self, collection: &str, note: &Note) -> Result<NoteId, StoreError>;

    /// Fully overwrites the record with the given id (upsert,
    /// last-writer-wins).
    async fn set(&self, collection: &str, id: &str, note: &Note) -> Result<(), StoreError>;

    /// Removes the record with the given id. Deleting a missing id is
    /// a success.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Opens a live query filtered to `owner_id`, returning the
    /// registration synchronously. The current result set is delivered
    /// as the first event.
    fn subscribe(&self, collection: &str, owner_id: &str) -> NoteSubscription;
}
