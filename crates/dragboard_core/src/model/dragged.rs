//! Snapshot of the item currently being dragged.

use crate::model::column::ColumnHandle;
use crate::model::geometry::Rect;
use crate::model::row::RowHandle;
use crate::model::{ColumnId, RowId};

/// What kind of entity a drag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Row,
    Column,
}

/// Caller-held record of the dragged item.
///
/// `layout` is captured at pick-up and serves as the dragged item's "last
/// known position" for height-compensated hit-testing. `column_id` and
/// `index` track where the item currently lives; `origin_column_id` is where
/// the drag started.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggedItem {
    pub kind: DragKind,
    pub id: RowId,
    pub index: usize,
    pub column_id: ColumnId,
    pub origin_column_id: ColumnId,
    pub layout: Option<Rect>,
}

impl DraggedItem {
    pub fn from_row<R>(row: &RowHandle<R>) -> Self {
        Self {
            kind: DragKind::Row,
            id: row.id().to_string(),
            index: row.index(),
            column_id: row.column_id().to_string(),
            origin_column_id: row.column_id().to_string(),
            layout: row.layout(),
        }
    }

    pub fn from_column<C, R>(column: &ColumnHandle<C, R>) -> Self {
        Self {
            kind: DragKind::Column,
            id: column.id().to_string(),
            index: column.index(),
            column_id: column.id().to_string(),
            origin_column_id: column.id().to_string(),
            layout: column.layout(),
        }
    }

    /// Whether the item left the column it was picked up from.
    pub fn changed_column(&self) -> bool {
        self.column_id != self.origin_column_id
    }
}
