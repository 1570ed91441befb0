//! Note domain record.
//!
//! # Invariants
//! - `id` is assigned by the remote store on first persistence (empty
//!   before that) and is immutable afterwards.
//! - `owner_id` equals the authenticated user's id at creation time and
//!   is never changed by the client.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned stable note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = String;

/// One personal text note, as persisted in the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned document id. Empty until first persistence.
    pub id: NoteId,
    /// Stable id of the user owning this note.
    pub owner_id: String,
    /// Short note title.
    pub title: String,
    /// Free-form note body.
    pub content: String,
    /// Unix epoch milliseconds. Stamped at creation and refreshed on
    /// every update.
    pub updated_at: i64,
}

impl Note {
    /// Creates a not-yet-persisted note owned by `owner_id`.
    ///
    /// The id stays empty until the remote store assigns one.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: NoteId::new(),
            owner_id: owner_id.into(),
            title: title.into(),
            content: content.into(),
            updated_at: now_millis(),
        }
    }

    /// Returns whether this note has been persisted remotely.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Refreshes the update timestamp to the current time.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{now_millis, Note};

    #[test]
    fn new_note_starts_unpersisted_with_owner_and_timestamp() {
        let before = now_millis();
        let note = Note::new("u1", "Title", "Body");
        assert!(!note.is_persisted());
        assert_eq!(note.owner_id, "u1");
        assert!(note.updated_at >= before);
    }

    #[test]
    fn touch_never_moves_timestamp_backwards() {
        let mut note = Note::new("u1", "Title", "Body");
        let first = note.updated_at;
        note.touch();
        assert!(note.updated_at >= first);
    }

    #[test]
    fn note_serializes_with_stable_field_names() {
        let note = Note {
            id: "n1".to_string(),
            owner_id: "u1".to_string(),
            title: "T".to_string(),
            content: "C".to_string(),
            updated_at: 42,
        };
        let value = serde_json::to_value(&note).expect("note should serialize");
        assert_eq!(value["id"], "n1");
        assert_eq!(value["owner_id"], "u1");
        assert_eq!(value["updated_at"], 42);
    }
}
