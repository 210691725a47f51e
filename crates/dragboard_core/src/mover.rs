//! Pointer hit-testing and in-place reordering.
//!
//! # Responsibility
//! - Locate the column and row slot under a pointer sample.
//! - Reorder rows by walking adjacent payload swaps, and reparent rows
//!   between columns.
//!
//! # Invariants
//! - Entities without a measured layout are never hit targets and never swap.
//! - The mover keeps no board state of its own; it mutates the store only
//!   through entity setters and then asks the store to notify.

use crate::config::DEFAULT_EDGE_THRESHOLD;
use crate::model::column::ColumnHandle;
use crate::model::geometry::Rect;
use crate::model::row::RowHandle;
use crate::repo::board_repo::Repository;
use crate::repo::listeners::EVENT_RELOAD;
use log::debug;

/// Stateless geometry resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    edge_threshold: f64,
}

impl Default for Mover {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_THRESHOLD)
    }
}

impl Mover {
    pub fn new(edge_threshold: f64) -> Self {
        Self { edge_threshold }
    }

    pub fn edge_threshold(&self) -> f64 {
        self.edge_threshold
    }

    /// First column (in list order) whose rect, grown vertically by the edge
    /// threshold, strictly contains the point.
    pub fn find_column_at_position<'a, C, R>(
        &self,
        columns: &'a [ColumnHandle<C, R>],
        x: f64,
        y: f64,
    ) -> Option<&'a ColumnHandle<C, R>> {
        self.find_column_index_at_position(columns, x, y)
            .map(|index| &columns[index])
    }

    /// Slot position variant of [`Mover::find_column_at_position`].
    pub fn find_column_index_at_position<C, R>(
        &self,
        columns: &[ColumnHandle<C, R>],
        x: f64,
        y: f64,
    ) -> Option<usize> {
        columns.iter().position(|column| {
            column.layout().is_some_and(|layout| {
                layout.spans_x(x)
                    && y > layout.y - self.edge_threshold
                    && y < layout.bottom() + self.edge_threshold
            })
        })
    }

    /// Height-compensated containment test of one candidate row.
    ///
    /// When the dragged row and the candidate differ in height, the candidate's
    /// vertical band is shifted by the difference toward the side the pointer
    /// is coming from, so a short row swaps past a tall one at a point
    /// proportional to the mismatch.
    pub fn select_item<R>(
        &self,
        x: f64,
        y: f64,
        dragged_layout: Option<Rect>,
        item: &RowHandle<R>,
    ) -> bool {
        let (Some(layout), Some(dragged)) = (item.layout(), dragged_layout) else {
            return false;
        };

        let height_diff = (dragged.height - layout.height).abs();
        if !layout.spans_x(x) {
            return false;
        }

        let (up, down) = if height_diff > layout.height {
            (y > layout.y, y < layout.bottom())
        } else if y < dragged.y {
            (y > layout.y, y < layout.bottom() - height_diff)
        } else {
            (y > layout.y + height_diff, y < layout.bottom())
        };
        up && down
    }

    /// Row slot the dragged row should occupy for a pointer sample.
    ///
    /// Falls back to the first row when the pointer is at or above its top and
    /// to the last row when at or below the last row's top, so a column with
    /// at least one measured row always yields a target.
    pub fn find_row_at_position<'a, R>(
        &self,
        rows: &'a [RowHandle<R>],
        x: f64,
        y: f64,
        dragged_layout: Option<Rect>,
    ) -> Option<&'a RowHandle<R>> {
        if let Some(row) = rows
            .iter()
            .find(|row| self.select_item(x, y, dragged_layout, row))
        {
            return Some(row);
        }

        if let Some(first) = rows.first() {
            if first.layout().is_some_and(|layout| y <= layout.y) {
                return Some(first);
            }
        }

        rows.last()
            .filter(|last| last.layout().is_some_and(|layout| y >= layout.y))
    }

    /// Exchanges the logical rows occupying two measured slots.
    ///
    /// No-op when either slot lacks a layout.
    pub fn switch_items<R>(&self, first: &mut RowHandle<R>, second: &mut RowHandle<R>) {
        if first.layout().is_none() || second.layout().is_none() {
            return;
        }
        first.swap_payload(second);
    }

    /// Walks the row at `dragged_index` to `target_index` one adjacent swap at
    /// a time, re-indexes the column and notifies its listeners once.
    pub fn switch_items_between<C, R>(
        &self,
        repo: &mut Repository<C, R>,
        dragged_index: usize,
        target_index: usize,
        column_id: &str,
    ) {
        let Some(column) = repo.column_mut(column_id) else {
            return;
        };
        let rows = column.rows_mut();
        let Some(last) = rows.len().checked_sub(1) else {
            return;
        };
        let from = dragged_index.min(last);
        let to = target_index.min(last);

        if from > to {
            for index in (to..from).rev() {
                self.switch_adjacent(rows, index);
            }
        } else {
            for index in from..to {
                self.switch_adjacent(rows, index);
            }
        }

        column.measure_row_index();
        debug!(
            "event=row_walk module=mover status=ok column={} from={} to={}",
            column_id, from, to
        );
        repo.notify(column_id, EVENT_RELOAD);
    }

    /// Removes one row from `from_column_id`, appends it to the tail of
    /// `to_column_id` and notifies both columns.
    ///
    /// Returns `false` (and changes nothing) when either column or the row is
    /// missing.
    pub fn move_to_other_column<C, R>(
        &self,
        repo: &mut Repository<C, R>,
        row_id: &str,
        from_column_id: &str,
        to_column_id: &str,
    ) -> bool {
        if from_column_id == to_column_id || repo.column(to_column_id).is_none() {
            return false;
        }
        let Some(row) = repo
            .column_mut(from_column_id)
            .and_then(|column| column.remove_row(row_id))
        else {
            return false;
        };
        if let Some(column) = repo.column_mut(to_column_id) {
            column.add_row(row);
        }

        debug!(
            "event=row_reparent module=mover status=ok row={} from={} to={}",
            row_id, from_column_id, to_column_id
        );
        repo.notify(from_column_id, EVENT_RELOAD);
        repo.notify(to_column_id, EVENT_RELOAD);
        true
    }

    fn switch_adjacent<R>(&self, rows: &mut [RowHandle<R>], index: usize) {
        let (head, tail) = rows.split_at_mut(index + 1);
        self.switch_items(&mut head[index], &mut tail[0]);
    }
}

#[cfg(test)]
mod tests {
    use super::Mover;
    use crate::model::column::ColumnHandle;
    use crate::model::geometry::Rect;
    use crate::model::row::RowHandle;

    fn column(id: &str, layout: Option<Rect>) -> ColumnHandle<(), ()> {
        let mut column = ColumnHandle::new(id, 0, ());
        column.set_layout(layout);
        column
    }

    fn row(id: &str, layout: Option<Rect>) -> RowHandle<()> {
        let mut row = RowHandle::new(id, 0, "1", ());
        row.set_layout(layout);
        row
    }

    #[test]
    fn column_hit_band_extends_by_edge_threshold() {
        let mover = Mover::default();
        let columns = vec![column("1", Some(Rect::new(0.0, 0.0, 100.0, 200.0)))];

        assert!(mover.find_column_at_position(&columns, 50.0, -20.0).is_some());
        assert!(mover.find_column_at_position(&columns, 50.0, -40.0).is_none());
        assert!(mover.find_column_at_position(&columns, 50.0, 230.0).is_some());
        assert!(mover.find_column_at_position(&columns, 50.0, 240.0).is_none());
        assert!(mover.find_column_at_position(&columns, 0.0, 100.0).is_none());
    }

    #[test]
    fn unmeasured_columns_are_skipped() {
        let mover = Mover::default();
        let columns = vec![
            column("1", None),
            column("2", Some(Rect::new(0.0, 0.0, 100.0, 200.0))),
        ];

        let hit = mover
            .find_column_at_position(&columns, 50.0, 50.0)
            .expect("measured column should be hit");
        assert_eq!(hit.id(), "2");
    }

    #[test]
    fn select_item_requires_both_layouts() {
        let mover = Mover::default();
        let candidate = row("a", Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert!(!mover.select_item(50.0, 25.0, None, &candidate));

        let unmeasured = row("b", None);
        assert!(!mover.select_item(
            50.0,
            25.0,
            Some(Rect::new(0.0, 0.0, 100.0, 50.0)),
            &unmeasured
        ));
    }

    #[test]
    fn select_item_shifts_band_by_height_difference() {
        let mover = Mover::default();
        let tall = row("tall", Some(Rect::new(0.0, 100.0, 100.0, 80.0)));
        let dragged_below = Some(Rect::new(0.0, 300.0, 100.0, 40.0));
        let dragged_above = Some(Rect::new(0.0, 0.0, 100.0, 40.0));

        // Pointer above the dragged row: bottom bound tightened by 40.
        assert!(mover.select_item(50.0, 130.0, dragged_below, &tall));
        assert!(!mover.select_item(50.0, 150.0, dragged_below, &tall));

        // Pointer below the dragged row: top bound pushed down by 40.
        assert!(!mover.select_item(50.0, 130.0, dragged_above, &tall));
        assert!(mover.select_item(50.0, 150.0, dragged_above, &tall));
    }

    #[test]
    fn select_item_uses_raw_bounds_for_oversized_mismatch() {
        let mover = Mover::default();
        let short = row("short", Some(Rect::new(0.0, 100.0, 100.0, 20.0)));
        let huge_dragged = Some(Rect::new(0.0, 0.0, 100.0, 200.0));

        assert!(mover.select_item(50.0, 101.0, huge_dragged, &short));
        assert!(mover.select_item(50.0, 119.0, huge_dragged, &short));
        assert!(!mover.select_item(50.0, 121.0, huge_dragged, &short));
    }

    #[test]
    fn find_row_falls_back_to_first_and_last() {
        let mover = Mover::default();
        let rows = vec![
            row("a", Some(Rect::new(0.0, 100.0, 100.0, 50.0))),
            row("b", Some(Rect::new(0.0, 150.0, 100.0, 50.0))),
        ];
        let dragged = Some(Rect::new(0.0, 100.0, 100.0, 50.0));

        let above = mover
            .find_row_at_position(&rows, 50.0, 90.0, dragged)
            .expect("first row fallback");
        assert_eq!(above.id(), "a");

        let below = mover
            .find_row_at_position(&rows, 50.0, 400.0, dragged)
            .expect("last row fallback");
        assert_eq!(below.id(), "b");

        // Outside horizontally but vertically past the tail still appends.
        let aside = mover
            .find_row_at_position(&rows, 500.0, 400.0, dragged)
            .expect("last row fallback ignores x");
        assert_eq!(aside.id(), "b");
    }

    #[test]
    fn find_row_returns_none_for_unmeasured_column() {
        let mover = Mover::default();
        let rows = vec![row("a", None)];
        assert!(mover
            .find_row_at_position(&rows, 50.0, 10.0, Some(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .is_none());
        assert!(mover
            .find_row_at_position::<()>(&[], 50.0, 10.0, None)
            .is_none());
    }

    #[test]
    fn switch_items_is_noop_without_layouts() {
        let mover = Mover::default();
        let mut first = row("a", Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let mut second = row("b", None);

        mover.switch_items(&mut first, &mut second);
        assert_eq!(first.id(), "a");
        assert_eq!(second.id(), "b");
    }
}
