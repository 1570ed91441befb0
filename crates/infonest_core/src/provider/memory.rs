//! In-process reference providers.
//!
//! # Responsibility
//! - Provide identity/store implementations with the same observable
//!   behavior as the hosted services, for tests and the CLI probe.
//! - Expose call counters and fault injection so tests can assert that
//!   validation failures never reach the "network".
//!
//! # Invariants
//! - Snapshots are filtered by owner before delivery, mirroring the
//!   server-side query filter.
//! - Every mutation pushes a fresh snapshot to all live subscribers.

use crate::model::identity::Identity;
use crate::model::note::{Note, NoteId};
use crate::provider::identity::{AuthError, AuthErrorKind, IdentityProvider};
use crate::provider::store::{
    DocumentStore, NoteSubscription, SnapshotEvent, StoreError, SubscriptionHandle,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Provider-side minimum password length, mirroring the hosted
/// service's weak-password rule (distinct from local validation).
const PROVIDER_MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user_id: String,
    email: String,
    password: String,
    display_name: String,
}

/// In-memory identity provider with hosted-service failure mapping.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<Vec<Account>>,
    current_user: Mutex<Option<String>>,
    auth_calls: AtomicUsize,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one account without going through `sign_up`.
    pub fn with_account(self, email: &str, password: &str, display_name: &str) -> Self {
        {
            let mut accounts = self.accounts.lock().expect("accounts lock");
            let user_id = format!("user-{}", accounts.len() + 1);
            accounts.push(Account {
                user_id,
                email: email.to_string(),
                password: password.to_string(),
                display_name: display_name.to_string(),
            });
        }
        self
    }

    /// Number of sign-in/sign-up/reset calls that reached the provider.
    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.record_call();
        let accounts = self.accounts.lock().expect("accounts lock");
        let Some(account) = accounts.iter().find(|account| account.email == email) else {
            return Err(AuthError::new(
                AuthErrorKind::UnknownOrDisabledUser,
                email.to_string(),
            ));
        };
        if account.password != password {
            return Err(AuthError::new(
                AuthErrorKind::InvalidCredentials,
                email.to_string(),
            ));
        }
        let identity = Identity::new(
            account.user_id.clone(),
            account.email.clone(),
            account.display_name.clone(),
        );
        drop(accounts);
        *self.current_user.lock().expect("current user lock") = Some(identity.user_id.clone());
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.record_call();
        if password.len() < PROVIDER_MIN_PASSWORD_LEN {
            return Err(AuthError::new(
                AuthErrorKind::WeakPassword,
                format!("password must be at least {PROVIDER_MIN_PASSWORD_LEN} characters"),
            ));
        }
        let mut accounts = self.accounts.lock().expect("accounts lock");
        if accounts.iter().any(|account| account.email == email) {
            return Err(AuthError::new(
                AuthErrorKind::EmailAlreadyInUse,
                email.to_string(),
            ));
        }
        let user_id = Uuid::new_v4().to_string();
        accounts.push(Account {
            user_id: user_id.clone(),
            email: email.to_string(),
            password: password.to_string(),
            display_name: "Unknown User".to_string(),
        });
        drop(accounts);
        *self.current_user.lock().expect("current user lock") = Some(user_id.clone());
        Ok(Identity::new(user_id, email, "Unknown User"))
    }

    async fn set_display_name(&self, user_id: &str, name: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().expect("accounts lock");
        match accounts
            .iter_mut()
            .find(|account| account.user_id == user_id)
        {
            Some(account) => {
                account.display_name = name.to_string();
                Ok(())
            }
            None => Err(AuthError::new(
                AuthErrorKind::UnknownOrDisabledUser,
                user_id.to_string(),
            )),
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.record_call();
        // Fire-and-forget: the hosted service accepts reset requests
        // for unknown addresses without leaking account existence.
        let _ = email;
        Ok(())
    }

    async fn sign_out(&self) {
        *self.current_user.lock().expect("current user lock") = None;
    }

    fn current_user_id(&self) -> Option<String> {
        self.current_user.lock().expect("current user lock").clone()
    }
}

struct Subscriber {
    owner_id: String,
    events: mpsc::UnboundedSender<SnapshotEvent>,
}

#[derive(Default)]
struct StoreInner {
    docs: HashMap<NoteId, Note>,
    subscribers: HashMap<u64, Subscriber>,
    next_subscriber_id: u64,
    mutation_count: usize,
}

impl StoreInner {
    fn snapshot_for(&self, owner_id: &str) -> Vec<Note> {
        self.docs
            .values()
            .filter(|note| note.owner_id == owner_id)
            .cloned()
            .collect()
    }

    fn notify_all(&mut self) {
        let snapshots: Vec<(u64, Vec<Note>)> = self
            .subscribers
            .iter()
            .map(|(id, subscriber)| (*id, self.snapshot_for(&subscriber.owner_id)))
            .collect();
        let mut dead = Vec::new();
        for (id, snapshot) in snapshots {
            if let Some(subscriber) = self.subscribers.get(&id) {
                if subscriber
                    .events
                    .send(SnapshotEvent::Snapshot(snapshot))
                    .is_err()
                {
                    dead.push(id);
                }
            }
        }
        for id in dead {
            self.subscribers.remove(&id);
        }
    }
}

/// In-memory document store with live, owner-filtered subscriptions.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of add/set/delete calls that reached the store.
    pub fn mutation_count(&self) -> usize {
        self.inner.lock().expect("store lock").mutation_count
    }

    /// Pushes a delivery error to every live subscriber for `owner_id`.
    ///
    /// Fault injection for the subscription error policy.
    pub fn emit_error(&self, owner_id: &str, error: StoreError) {
        let inner = self.inner.lock().expect("store lock");
        for subscriber in inner.subscribers.values() {
            if subscriber.owner_id == owner_id {
                let _ = subscriber.events.send(SnapshotEvent::Error(error.clone()));
            }
        }
    }

    /// Number of currently attached live subscriptions.
    pub fn live_subscriptions(&self) -> usize {
        self.inner.lock().expect("store lock").subscribers.len()
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn add(&self, _collection: &str, note: &Note) -> Result<NoteId, StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        inner.mutation_count += 1;
        let id: NoteId = Uuid::new_v4().to_string();
        let mut persisted = note.clone();
        persisted.id = id.clone();
        inner.docs.insert(id.clone(), persisted);
        inner.notify_all();
        Ok(id)
    }

    async fn set(&self, _collection: &str, id: &str, note: &Note) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        inner.mutation_count += 1;
        let mut persisted = note.clone();
        persisted.id = id.to_string();
        inner.docs.insert(id.to_string(), persisted);
        inner.notify_all();
        Ok(())
    }

    async fn delete(&self, _collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock");
        inner.mutation_count += 1;
        // Deleting a missing id is a success, matching the hosted
        // store's idempotent delete.
        inner.docs.remove(id);
        inner.notify_all();
        Ok(())
    }

    fn subscribe(&self, _collection: &str, owner_id: &str) -> NoteSubscription {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().expect("store lock");
        let initial = inner.snapshot_for(owner_id);
        let _ = events_tx.send(SnapshotEvent::Snapshot(initial));

        let subscriber_id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.insert(
            subscriber_id,
            Subscriber {
                owner_id: owner_id.to_string(),
                events: events_tx,
            },
        );
        drop(inner);

        let registry = Arc::clone(&self.inner);
        let handle = SubscriptionHandle::new(move || {
            registry
                .lock()
                .expect("store lock")
                .subscribers
                .remove(&subscriber_id);
        });

        NoteSubscription {
            handle,
            events: events_rx,
        }
    }
}
