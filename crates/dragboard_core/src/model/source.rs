//! Application-owned board payload.
//!
//! # Responsibility
//! - Describe the board the store is constructed from and commits back to.
//!
//! # Invariants
//! - Ids are stable for the lifetime of a column/row and never reused.
//! - Payloads are opaque to the engine; only ids and order are interpreted.

use crate::model::{ColumnId, RowId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row as supplied by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow<R> {
    pub id: RowId,
    pub data: R,
}

impl<R> SourceRow<R> {
    /// Creates a row with a generated stable id.
    pub fn new(data: R) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), data)
    }

    /// Creates a row with a caller-provided stable id.
    pub fn with_id(id: impl Into<RowId>, data: R) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// One column and its ordered rows as supplied by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceColumn<C, R> {
    pub id: ColumnId,
    pub data: C,
    #[serde(default = "Vec::new")]
    pub rows: Vec<SourceRow<R>>,
}

impl<C, R> SourceColumn<C, R> {
    /// Creates an empty column with a generated stable id.
    pub fn new(data: C) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), data)
    }

    /// Creates an empty column with a caller-provided stable id.
    pub fn with_id(id: impl Into<ColumnId>, data: C) -> Self {
        Self {
            id: id.into(),
            data,
            rows: Vec::new(),
        }
    }

    /// Builder-style row append.
    pub fn with_row(mut self, row: SourceRow<R>) -> Self {
        self.rows.push(row);
        self
    }

    /// Row ids in display order.
    pub fn row_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{SourceColumn, SourceRow};

    #[test]
    fn generated_ids_are_unique() {
        let first = SourceRow::new(());
        let second = SourceRow::new(());
        assert_ne!(first.id, second.id);
        assert!(!first.id.is_empty());
    }

    #[test]
    fn rows_default_to_empty_when_missing_from_json() {
        let column: SourceColumn<String, String> =
            serde_json::from_str(r#"{"id":"1","data":"Todo"}"#).expect("column should parse");
        assert_eq!(column.id, "1");
        assert!(column.rows.is_empty());
    }
}
