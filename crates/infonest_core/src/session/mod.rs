//! Session layer: authentication and identity lifetime.
//!
//! # Responsibility
//! - Hold the current authenticated identity for the process lifetime.
//! - Normalize identity-provider outcomes into the session error set.

pub mod session_store;
