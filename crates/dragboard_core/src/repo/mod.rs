//! Board store and its change notification.
//!
//! # Responsibility
//! - Hold the ordered columns and rows of one board in memory.
//! - Tell registered views which column changed after each mutation.
//!
//! # Invariants
//! - The store is owned by one UI thread; only measurement replies cross
//!   threads.
//! - Listener callbacks run synchronously inside the mutating call.

pub mod board_repo;
pub mod listeners;
