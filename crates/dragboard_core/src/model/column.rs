//! Column position entity.
//!
//! # Responsibility
//! - Own one column's ordered row list.
//! - Cache the column's measured rectangle and cascade measurement to rows.
//!
//! # Invariants
//! - `rows[i].index() == i` after every completed mutation.
//! - Every row in `rows` has `column_id() == id`.

use crate::model::anchor::{measure_anchor, AnchorRef, ScrollAnchorRef};
use crate::model::geometry::{Rect, ScrollOffset};
use crate::model::row::RowHandle;
use crate::model::source::SourceColumn;
use crate::model::ColumnId;
use futures::future::join_all;
use log::debug;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Mutable handle for one column.
#[derive(Clone)]
pub struct ColumnHandle<C, R> {
    anchor: Option<AnchorRef>,
    scroll_anchor: Option<ScrollAnchorRef>,
    layout: Option<Rect>,
    id: ColumnId,
    index: usize,
    data: C,
    rows: Vec<RowHandle<R>>,
    hidden: bool,
}

impl<C, R> ColumnHandle<C, R> {
    /// Creates an empty, unmeasured column.
    pub fn new(id: impl Into<ColumnId>, index: usize, data: C) -> Self {
        Self {
            anchor: None,
            scroll_anchor: None,
            layout: None,
            id: id.into(),
            index,
            data,
            rows: Vec::new(),
            hidden: false,
        }
    }

    pub(crate) fn from_source(source: SourceColumn<C, R>, index: usize) -> Self {
        let mut column = Self::new(source.id, index, source.data);
        for (row_index, row) in source.rows.into_iter().enumerate() {
            column
                .rows
                .push(RowHandle::from_source(row, row_index, &column.id));
        }
        column
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn data(&self) -> &C {
        &self.data
    }

    pub fn rows(&self) -> &[RowHandle<R>] {
        &self.rows
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn layout(&self) -> Option<Rect> {
        self.layout
    }

    pub fn row(&self, row_id: &str) -> Option<&RowHandle<R>> {
        self.rows.iter().find(|row| row.id() == row_id)
    }

    /// Slot position of `row_id` in this column.
    pub fn position_of(&self, row_id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == row_id)
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<RowHandle<R>> {
        &mut self.rows
    }

    pub(crate) fn row_mut(&mut self, row_id: &str) -> Option<&mut RowHandle<R>> {
        self.rows.iter_mut().find(|row| row.id() == row_id)
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn set_data(&mut self, data: C) {
        self.data = data;
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn set_layout(&mut self, layout: Option<Rect>) {
        self.layout = layout;
    }

    pub fn set_anchor(&mut self, anchor: Option<AnchorRef>) {
        self.anchor = anchor;
    }

    pub fn set_scroll_anchor(&mut self, anchor: Option<ScrollAnchorRef>) {
        self.scroll_anchor = anchor;
    }

    /// Scrolls the column's row list, if a scroll container is bound.
    pub fn scroll_to_offset(&self, offset: f64) -> bool {
        match &self.scroll_anchor {
            Some(anchor) => {
                anchor.scroll_to_offset(offset);
                true
            }
            None => false,
        }
    }

    /// Appends `row` at the tail, re-parenting it to this column.
    pub fn add_row(&mut self, mut row: RowHandle<R>) {
        row.set_column_id(self.id.clone());
        row.set_index(self.rows.len());
        self.rows.push(row);
    }

    /// Removes one row by id and closes the index gap.
    pub fn remove_row(&mut self, row_id: &str) -> Option<RowHandle<R>> {
        let position = self.position_of(row_id)?;
        let row = self.rows.remove(position);
        self.measure_row_index();
        Some(row)
    }

    /// Rewrites every row index to its slot position.
    pub fn measure_row_index(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.set_index(index);
        }
    }

    /// Measures every row concurrently with the same scroll correction.
    ///
    /// Returns how many rows reported a rectangle.
    pub async fn measure_row_layout(&mut self, offset: ScrollOffset, timeout: Duration) -> usize {
        let results = join_all(
            self.rows
                .iter_mut()
                .map(|row| row.measure_layout(offset, timeout)),
        )
        .await;
        let measured = results.into_iter().filter(|ok| *ok).count();
        debug!(
            "event=measure_rows module=model status=ok column={} measured={} total={}",
            self.id,
            measured,
            self.rows.len()
        );
        measured
    }

    /// Measures the column, then cascades to its rows on success.
    pub async fn measure_layout(&mut self, offset: ScrollOffset, timeout: Duration) -> bool {
        let Some(rect) = measure_anchor(self.anchor.clone(), offset, timeout).await else {
            return false;
        };
        self.layout = Some(rect);
        self.measure_row_layout(offset, timeout).await;
        true
    }
}

impl<C, R> Debug for ColumnHandle<C, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnHandle")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("hidden", &self.hidden)
            .field("layout", &self.layout)
            .field("rows", &self.rows)
            .finish()
    }
}
