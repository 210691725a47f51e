//! Drag orchestration on top of the board store.
//!
//! # Responsibility
//! - Turn a gesture stream into store calls and scroll requests.
//! - Keep host/UI layers decoupled from hit-testing details.

pub mod drag_session;
