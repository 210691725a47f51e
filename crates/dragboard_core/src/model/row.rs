//! Row position entity.
//!
//! # Responsibility
//! - Hold one draggable row's identity, slot index, owning column and payload.
//! - Cache the row's last measured rectangle.
//!
//! # Invariants
//! - `index` equals the row's position in its column's list after every
//!   completed mutation (it may be transiently off during a swap walk).
//! - `column_id` is a back-reference; the column's row list owns the row.
//! - `hidden` is true only while this row is the one being dragged.

use crate::model::anchor::{measure_anchor, AnchorRef};
use crate::model::geometry::{Rect, ScrollOffset};
use crate::model::source::SourceRow;
use crate::model::{ColumnId, RowId};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Mutable handle for one row slot.
#[derive(Clone)]
pub struct RowHandle<R> {
    anchor: Option<AnchorRef>,
    layout: Option<Rect>,
    id: RowId,
    index: usize,
    column_id: ColumnId,
    data: R,
    hidden: bool,
}

impl<R> RowHandle<R> {
    /// Creates an unmeasured, visible row.
    pub fn new(
        id: impl Into<RowId>,
        index: usize,
        column_id: impl Into<ColumnId>,
        data: R,
    ) -> Self {
        Self {
            anchor: None,
            layout: None,
            id: id.into(),
            index,
            column_id: column_id.into(),
            data,
            hidden: false,
        }
    }

    pub(crate) fn from_source(source: SourceRow<R>, index: usize, column_id: &str) -> Self {
        Self::new(source.id, index, column_id, source.data)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    pub fn data(&self) -> &R {
        &self.data
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn layout(&self) -> Option<Rect> {
        self.layout
    }

    pub fn anchor(&self) -> Option<&AnchorRef> {
        self.anchor.as_ref()
    }

    pub fn set_id(&mut self, id: impl Into<RowId>) {
        self.id = id.into();
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn set_column_id(&mut self, column_id: impl Into<ColumnId>) {
        self.column_id = column_id.into();
    }

    pub fn set_data(&mut self, data: R) {
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

    /// Exchanges everything that identifies the logical row (anchor, index,
    /// id, payload, hidden flag) with `other`. Layout and column stay with
    /// the slot.
    pub(crate) fn swap_payload(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.anchor, &mut other.anchor);
        std::mem::swap(&mut self.index, &mut other.index);
        std::mem::swap(&mut self.id, &mut other.id);
        std::mem::swap(&mut self.data, &mut other.data);
        std::mem::swap(&mut self.hidden, &mut other.hidden);
    }

    /// Re-measures this row through its anchor.
    ///
    /// Returns `false` when no anchor is bound or the anchor did not answer
    /// within `timeout`; the cached layout is left untouched in that case.
    pub async fn measure_layout(&mut self, offset: ScrollOffset, timeout: Duration) -> bool {
        match measure_anchor(self.anchor.clone(), offset, timeout).await {
            Some(rect) => {
                self.layout = Some(rect);
                true
            }
            None => false,
        }
    }
}

impl<R> Debug for RowHandle<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowHandle")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("column_id", &self.column_id)
            .field("hidden", &self.hidden)
            .field("layout", &self.layout)
            .field("anchored", &self.anchor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::RowHandle;
    use crate::model::anchor::FixedAnchor;
    use crate::model::geometry::{Rect, ScrollOffset};
    use std::time::Duration;

    #[test]
    fn swap_payload_keeps_slot_geometry() {
        let mut first = RowHandle::new("a", 0, "col", "A");
        let mut second = RowHandle::new("b", 1, "col", "B");
        first.set_layout(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        second.set_layout(Some(Rect::new(0.0, 10.0, 10.0, 10.0)));
        second.set_hidden(true);

        first.swap_payload(&mut second);

        assert_eq!(first.id(), "b");
        assert_eq!(*first.data(), "B");
        assert!(first.is_hidden());
        assert_eq!(first.index(), 1);
        assert_eq!(first.layout(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(second.id(), "a");
        assert!(!second.is_hidden());
        assert_eq!(second.layout(), Some(Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[tokio::test]
    async fn measure_layout_updates_cached_rect() {
        let mut row = RowHandle::new("a", 0, "col", ());
        row.set_anchor(Some(FixedAnchor::shared(Rect::new(1.0, 2.0, 3.0, 4.0))));

        assert!(
            row.measure_layout(ScrollOffset::horizontal(10.0), Duration::from_millis(300))
                .await
        );
        assert_eq!(row.layout(), Some(Rect::new(11.0, 2.0, 3.0, 4.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn measure_layout_without_anchor_keeps_stale_rect() {
        let mut row = RowHandle::new("a", 0, "col", ());
        row.set_layout(Some(Rect::new(1.0, 1.0, 1.0, 1.0)));

        assert!(
            !row.measure_layout(ScrollOffset::NONE, Duration::from_millis(300))
                .await
        );
        assert_eq!(row.layout(), Some(Rect::new(1.0, 1.0, 1.0, 1.0)));
    }
}
