//! External service seams.
//!
//! # Responsibility
//! - Define the contracts this crate consumes from the identity
//!   provider and the remote document store.
//! - Keep backend details (Firebase, HTTP, in-process) out of the
//!   session/sync layers.

pub mod identity;
pub mod memory;
pub mod store;
