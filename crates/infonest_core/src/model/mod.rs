//! Domain model shared by session, sync and editor layers.
//!
//! # Responsibility
//! - Define the canonical records held in memory during a session.
//!
//! # Invariants
//! - An absent `Identity` means "logged out".
//! - Every `Note` observed by a session belongs to that session's user.

pub mod identity;
pub mod note;
