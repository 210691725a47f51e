//! Per-column change notification registry.
//!
//! # Invariants
//! - Callbacks are keyed by the exact `(column_id, event)` pair; there is no
//!   wildcard or bubbling.
//! - `dispatch` invokes callbacks synchronously in registration order.

use crate::model::row::RowHandle;
use std::collections::BTreeMap;

/// Event name asking the renderer to re-pull a column's rows.
pub const EVENT_RELOAD: &str = "reload";

/// View handed to listeners: the notified column's rows as of the mutation
/// that triggered the notification.
#[derive(Debug)]
pub struct ColumnEvent<'a, R> {
    pub column_id: &'a str,
    pub event: &'a str,
    pub rows: &'a [RowHandle<R>],
}

/// Listener callback.
pub type Listener<R> = Box<dyn FnMut(&ColumnEvent<'_, R>)>;

/// Registry of column listeners.
pub struct ListenerRegistry<R> {
    entries: BTreeMap<String, BTreeMap<String, Vec<Listener<R>>>>,
}

impl<R> Default for ListenerRegistry<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<R> ListenerRegistry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener` to the `(column_id, event)` list.
    pub fn add<F>(&mut self, column_id: &str, event: &str, listener: F)
    where
        F: FnMut(&ColumnEvent<'_, R>) + 'static,
    {
        self.entries
            .entry(column_id.to_string())
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(Box::new(listener));
    }

    /// Number of callbacks registered for one pair.
    pub fn count(&self, column_id: &str, event: &str) -> usize {
        self.entries
            .get(column_id)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }

    /// Drops every callback registered for `column_id`.
    pub fn remove_column(&mut self, column_id: &str) {
        self.entries.remove(column_id);
    }

    /// Invokes every callback for the pair; returns how many ran.
    pub fn dispatch(&mut self, column_id: &str, event: &str, rows: &[RowHandle<R>]) -> usize {
        let Some(listeners) = self
            .entries
            .get_mut(column_id)
            .and_then(|events| events.get_mut(event))
        else {
            return 0;
        };

        let payload = ColumnEvent {
            column_id,
            event,
            rows,
        };
        for listener in listeners.iter_mut() {
            listener(&payload);
        }
        listeners.len()
    }
}
