//! Note synchronization layer.
//!
//! # Responsibility
//! - Keep the observed note list consistent with the remote collection
//!   through one live subscription per session.
//! - Route create/update/delete mutations to the remote store.

pub mod engine;
pub mod watch;
