//! Authenticated identity record.

use serde::{Deserialize, Serialize};

/// The current authenticated user, held only in memory for the
/// lifetime of the session and cleared on logout.
///
/// # Invariants
/// - `user_id` is non-empty and stable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned stable user id.
    pub user_id: String,
    /// Email address the user authenticated with.
    pub email: String,
    /// Human-facing display name.
    pub display_name: String,
}

impl Identity {
    /// Creates an identity from provider-issued fields.
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            display_name: display_name.into(),
        }
    }
}
