//! Editor layer: single-note load/save/delete use-cases.

pub mod coordinator;
