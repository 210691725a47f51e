//! In-memory board store.
//!
//! # Responsibility
//! - Own the authoritative ordered columns and rows of one board.
//! - Drive one drag step per pointer sample (locate, reparent, walk, notify).
//! - Re-measure layouts and commit the final order back to the source payload.
//!
//! # Invariants
//! - `columns[j].index() == j` and `rows[i].index() == i` after every
//!   completed mutation.
//! - Every row lives in exactly one column's list and its `column_id` names
//!   that column.
//! - At most one row is hidden at any time outside a drag step.
//! - Deleting an unknown id is a silent no-op.

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::model::anchor::{AnchorRef, ScrollAnchorRef};
use crate::model::column::ColumnHandle;
use crate::model::dragged::DraggedItem;
use crate::model::geometry::{Rect, ScrollOffset};
use crate::model::row::RowHandle;
use crate::model::source::{SourceColumn, SourceRow};
use crate::mover::Mover;
use crate::repo::listeners::{ColumnEvent, ListenerRegistry, EVENT_RELOAD};
use futures::future::join_all;
use log::{debug, info, trace};
use serde::de::DeserializeOwned;

type ReloadCallback = Box<dyn FnMut()>;

/// Board store for columns with payload `C` and rows with payload `R`.
pub struct Repository<C, R> {
    columns: Vec<ColumnHandle<C, R>>,
    original: Vec<SourceColumn<C, R>>,
    listeners: ListenerRegistry<R>,
    reload: Option<ReloadCallback>,
    mover: Mover,
    config: BoardConfig,
}

impl<C, R> Repository<C, R> {
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn mover(&self) -> Mover {
        self.mover
    }

    /// Columns in board order.
    pub fn columns(&self) -> &[ColumnHandle<C, R>] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnHandle<C, R>> {
        self.columns.iter().find(|column| column.id() == column_id)
    }

    pub(crate) fn column_mut(&mut self, column_id: &str) -> Option<&mut ColumnHandle<C, R>> {
        self.columns
            .iter_mut()
            .find(|column| column.id() == column_id)
    }

    /// Rows of one column in display order; empty for an unknown column.
    pub fn rows_by_column_id(&self, column_id: &str) -> &[RowHandle<R>] {
        self.column(column_id).map_or(&[][..], ColumnHandle::rows)
    }

    /// Looks a row up anywhere on the board.
    pub fn find_row(&self, row_id: &str) -> Option<&RowHandle<R>> {
        self.columns.iter().find_map(|column| column.row(row_id))
    }

    /// Source payload as of the last commit.
    pub fn original_data(&self) -> &[SourceColumn<C, R>] {
        &self.original
    }

    /// Registers a callback for one `(column_id, event)` pair.
    pub fn add_listener<F>(&mut self, column_id: &str, event: &str, callback: F)
    where
        F: FnMut(&ColumnEvent<'_, R>) + 'static,
    {
        self.listeners.add(column_id, event, callback);
    }

    /// Synchronously invokes the pair's callbacks with the column's current
    /// rows. Returns how many callbacks ran.
    pub fn notify(&mut self, column_id: &str, event: &str) -> usize {
        let rows = self
            .columns
            .iter()
            .find(|column| column.id() == column_id)
            .map_or(&[][..], ColumnHandle::rows);
        self.listeners.dispatch(column_id, event, rows)
    }

    /// Registers the single full-board re-render callback.
    pub fn set_reload<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.reload = Some(Box::new(callback));
    }

    fn request_reload(&mut self) {
        if let Some(reload) = self.reload.as_mut() {
            reload();
        }
    }

    fn reindex_columns(&mut self) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.set_index(index);
        }
    }

    fn contains_row(&self, row_id: &str) -> bool {
        self.find_row(row_id).is_some()
    }

    fn column_of_row(&self, row_id: &str) -> Option<String> {
        self.columns
            .iter()
            .find(|column| column.row(row_id).is_some())
            .map(|column| column.id().to_string())
    }

    /// Binds (or clears) the visual anchor of a column.
    pub fn update_column_ref(&mut self, column_id: &str, anchor: Option<AnchorRef>) -> bool {
        match self.column_mut(column_id) {
            Some(column) => {
                column.set_anchor(anchor);
                true
            }
            None => false,
        }
    }

    /// Binds (or clears) the visual anchor of a row.
    pub fn update_row_ref(
        &mut self,
        column_id: &str,
        row_id: &str,
        anchor: Option<AnchorRef>,
    ) -> bool {
        match self
            .column_mut(column_id)
            .and_then(|column| column.row_mut(row_id))
        {
            Some(row) => {
                row.set_anchor(anchor);
                true
            }
            None => false,
        }
    }

    /// Binds (or clears) the scroll container of a column's row list.
    pub fn set_column_scroll_ref(
        &mut self,
        column_id: &str,
        anchor: Option<ScrollAnchorRef>,
    ) -> bool {
        match self.column_mut(column_id) {
            Some(column) => {
                column.set_scroll_anchor(anchor);
                true
            }
            None => false,
        }
    }

    /// Scrolls one column's row list.
    pub fn scroll_column(&self, column_id: &str, offset: f64) -> bool {
        self.column(column_id)
            .is_some_and(|column| column.scroll_to_offset(offset))
    }

    /// Re-measures one column and its rows after the renderer laid it out.
    pub async fn update_column_layout(&mut self, column_id: &str) -> bool {
        let timeout = self.config.measure_timeout();
        match self.column_mut(column_id) {
            Some(column) => column.measure_layout(ScrollOffset::NONE, timeout).await,
            None => false,
        }
    }

    /// Re-measures one row after the renderer laid it out.
    pub async fn update_row_layout(&mut self, column_id: &str, row_id: &str) -> bool {
        let timeout = self.config.measure_timeout();
        match self
            .column_mut(column_id)
            .and_then(|column| column.row_mut(row_id))
        {
            Some(row) => row.measure_layout(ScrollOffset::NONE, timeout).await,
            None => false,
        }
    }

    /// Re-measures every column and, transitively, every row.
    ///
    /// Safe to call repeatedly; returns how many columns were measured.
    pub async fn measure_columns_layout(&mut self) -> usize {
        let timeout = self.config.measure_timeout();
        let results = join_all(
            self.columns
                .iter_mut()
                .map(|column| column.measure_layout(ScrollOffset::NONE, timeout)),
        )
        .await;
        let measured = results.into_iter().filter(|ok| *ok).count();
        debug!(
            "event=measure_columns module=repo status=ok measured={} total={}",
            measured,
            self.columns.len()
        );
        measured
    }

    /// Hides `row_id` for the duration of a drag and notifies its column.
    ///
    /// Any other hidden row is shown again first, so at most one row is ever
    /// hidden. Returns `false` for an unknown row.
    pub fn hide_row(&mut self, row_id: &str) -> bool {
        if !self.contains_row(row_id) {
            return false;
        }

        let mut touched = Vec::new();
        for column in self.columns.iter_mut() {
            let mut changed = false;
            for row in column.rows_mut().iter_mut() {
                let hidden = row.id() == row_id;
                if row.is_hidden() != hidden {
                    row.set_hidden(hidden);
                    changed = true;
                }
            }
            if changed {
                touched.push(column.id().to_string());
            }
        }

        for column_id in touched {
            self.notify(&column_id, EVENT_RELOAD);
        }
        true
    }

    /// Shows `row_id` again and notifies its column if it was hidden.
    pub fn show_row(&mut self, row_id: &str) -> bool {
        let Some(column_id) = self.column_of_row(row_id) else {
            return false;
        };
        let changed = self
            .column_mut(&column_id)
            .and_then(|column| column.row_mut(row_id))
            .is_some_and(|row| {
                let was_hidden = row.is_hidden();
                row.set_hidden(false);
                was_hidden
            });
        if changed {
            self.notify(&column_id, EVENT_RELOAD);
        }
        true
    }

    /// Hides a column while it is dragged; shows any other hidden column.
    pub fn hide_column(&mut self, column_id: &str) -> bool {
        if self.column(column_id).is_none() {
            return false;
        }
        for column in self.columns.iter_mut() {
            let hidden = column.id() == column_id;
            column.set_hidden(hidden);
        }
        self.request_reload();
        true
    }

    /// Shows a dragged column again.
    pub fn show_column(&mut self, column_id: &str) -> bool {
        match self.column_mut(column_id) {
            Some(column) => column.set_hidden(false),
            None => return false,
        }
        self.request_reload();
        true
    }

    /// One drag step for a row.
    ///
    /// Locates the column under `(x, y)`, reparents the dragged row into it if
    /// needed (reporting `(from, to)` through `on_column_changed`), then walks
    /// the row to the slot under the pointer. Returns the column under the
    /// pointer, or `None` when the pointer is outside every column (in which
    /// case nothing changes).
    pub fn move_row<F>(
        &mut self,
        dragged: &mut DraggedItem,
        x: f64,
        y: f64,
        mut on_column_changed: F,
    ) -> Option<&ColumnHandle<C, R>>
    where
        F: FnMut(&str, &str),
    {
        let mover = self.mover;
        let target_id = mover
            .find_column_at_position(&self.columns, x, y)?
            .id()
            .to_string();

        if target_id != dragged.column_id {
            let from_id = dragged.column_id.clone();
            if mover.move_to_other_column(self, &dragged.id, &from_id, &target_id) {
                dragged.column_id = target_id.clone();
                on_column_changed(&from_id, &target_id);
            }
        }

        let walk = self.column(&target_id).and_then(|column| {
            let current = column.position_of(&dragged.id)?;
            let target = mover
                .find_row_at_position(column.rows(), x, y, dragged.layout)
                .map(RowHandle::index)?;
            Some((current, target))
        });

        if let Some((current, target)) = walk {
            dragged.index = current;
            if current != target {
                mover.switch_items_between(self, current, target, &target_id);
                if let Some(position) = self
                    .column(&target_id)
                    .and_then(|column| column.position_of(&dragged.id))
                {
                    dragged.index = position;
                }
            }
        }

        trace!(
            "event=row_move module=repo status=ok row={} column={} index={}",
            dragged.id,
            dragged.column_id,
            dragged.index
        );
        self.column(&target_id)
    }

    /// One drag step for a column: moves it to the slot under the pointer.
    ///
    /// Column slots keep their measured rectangles while the logical columns
    /// move between them, mirroring row swaps. Requests a full reload when the
    /// order changed.
    pub fn move_column(
        &mut self,
        dragged: &mut DraggedItem,
        x: f64,
        y: f64,
    ) -> Option<&ColumnHandle<C, R>> {
        let target = self
            .mover
            .find_column_index_at_position(&self.columns, x, y)?;
        let current = self
            .columns
            .iter()
            .position(|column| column.id() == dragged.id)?;

        if current != target {
            let slots: Vec<Option<Rect>> =
                self.columns.iter().map(ColumnHandle::layout).collect();
            let column = self.columns.remove(current);
            self.columns.insert(target, column);
            for (column, layout) in self.columns.iter_mut().zip(slots) {
                column.set_layout(layout);
            }
            self.reindex_columns();
            dragged.index = target;
            debug!(
                "event=column_move module=repo status=ok column={} from={} to={}",
                dragged.id, current, target
            );
            self.request_reload();
        }
        self.columns.get(target)
    }
}

impl<C: Clone, R: Clone> Repository<C, R> {
    /// Builds a store from the application's board with default tuning.
    pub fn new(board: Vec<SourceColumn<C, R>>) -> Self {
        let config = BoardConfig::default();
        let mover = Mover::new(config.edge_threshold);
        let columns = board
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, column)| ColumnHandle::from_source(column, index))
            .collect();
        Self {
            columns,
            original: board,
            listeners: ListenerRegistry::new(),
            reload: None,
            mover,
            config,
        }
    }

    /// Builds a store with validated tuning.
    pub fn with_config(board: Vec<SourceColumn<C, R>>, config: BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        let mut repo = Self::new(board);
        repo.mover = Mover::new(config.edge_threshold);
        repo.config = config;
        info!(
            "event=board_open module=repo status=ok columns={} rows={}",
            repo.columns.len(),
            repo.columns
                .iter()
                .map(|column| column.rows().len())
                .sum::<usize>()
        );
        Ok(repo)
    }

    /// Builds a store from a JSON array of columns.
    pub fn from_json_str(json: &str, config: BoardConfig) -> BoardResult<Self>
    where
        C: DeserializeOwned,
        R: DeserializeOwned,
    {
        let board: Vec<SourceColumn<C, R>> = serde_json::from_str(json)?;
        Self::with_config(board, config)
    }

    /// Appends a column at the end of the board and requests a reload.
    pub fn add_column(&mut self, column: SourceColumn<C, R>) -> BoardResult<()> {
        if self.column(&column.id).is_some() {
            return Err(BoardError::DuplicateColumn(column.id));
        }
        if let Some(row) = column.rows.iter().find(|row| self.contains_row(&row.id)) {
            return Err(BoardError::DuplicateRow(row.id.clone()));
        }

        let column_id = column.id.clone();
        self.columns
            .push(ColumnHandle::from_source(column, self.columns.len()));
        self.update_original_data();
        info!(
            "event=column_add module=repo status=ok column={} index={}",
            column_id,
            self.columns.len() - 1
        );
        self.request_reload();
        Ok(())
    }

    /// Removes a column and its rows; unknown ids are ignored.
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        let Some(position) = self
            .columns
            .iter()
            .position(|column| column.id() == column_id)
        else {
            return false;
        };

        self.columns.remove(position);
        self.reindex_columns();
        self.listeners.remove_column(column_id);
        self.update_original_data();
        info!("event=column_delete module=repo status=ok column={column_id}");
        self.request_reload();
        true
    }

    /// Appends a row to the tail of `column_id` and notifies that column.
    pub fn add_row(&mut self, column_id: &str, row: SourceRow<R>) -> BoardResult<()> {
        if self.contains_row(&row.id) {
            return Err(BoardError::DuplicateRow(row.id));
        }
        let column = self
            .column_mut(column_id)
            .ok_or_else(|| BoardError::ColumnNotFound(column_id.to_string()))?;

        let row_id = row.id.clone();
        column.add_row(RowHandle::from_source(row, 0, column_id));
        self.update_original_data();
        info!("event=row_add module=repo status=ok column={column_id} row={row_id}");
        self.notify(column_id, EVENT_RELOAD);
        Ok(())
    }

    /// Removes a row wherever it lives; unknown ids are ignored.
    pub fn delete_row(&mut self, row_id: &str) -> bool {
        let Some(column_id) = self.column_of_row(row_id) else {
            return false;
        };
        if let Some(column) = self.column_mut(&column_id) {
            column.remove_row(row_id);
        }
        self.update_original_data();
        info!("event=row_delete module=repo status=ok column={column_id} row={row_id}");
        self.notify(&column_id, EVENT_RELOAD);
        true
    }

    /// Copies the store's current order and membership back onto the source
    /// payload.
    pub fn update_original_data(&mut self) {
        self.original = self
            .columns
            .iter()
            .map(|column| SourceColumn {
                id: column.id().to_string(),
                data: column.data().clone(),
                rows: column
                    .rows()
                    .iter()
                    .map(|row| SourceRow::with_id(row.id(), row.data().clone()))
                    .collect(),
            })
            .collect();
        debug!(
            "event=commit module=repo status=ok columns={}",
            self.original.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::Repository;
    use crate::error::BoardError;
    use crate::model::source::{SourceColumn, SourceRow};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn board() -> Vec<SourceColumn<&'static str, &'static str>> {
        vec![
            SourceColumn::with_id("1", "Todo")
                .with_row(SourceRow::with_id("11", "a"))
                .with_row(SourceRow::with_id("12", "b")),
            SourceColumn::with_id("2", "Done").with_row(SourceRow::with_id("21", "c")),
        ]
    }

    #[test]
    fn construction_assigns_dense_indices() {
        let repo = Repository::new(board());
        assert_eq!(repo.columns()[1].index(), 1);
        let rows = repo.rows_by_column_id("1");
        assert_eq!(rows[0].index(), 0);
        assert_eq!(rows[1].index(), 1);
        assert_eq!(rows[1].column_id(), "1");
        assert!(repo.rows_by_column_id("missing").is_empty());
    }

    #[test]
    fn add_row_rejects_unknown_column_and_duplicate_id() {
        let mut repo = Repository::new(board());
        let err = repo
            .add_row("9", SourceRow::with_id("91", "x"))
            .expect_err("unknown column must fail");
        assert!(matches!(err, BoardError::ColumnNotFound(id) if id == "9"));

        let err = repo
            .add_row("2", SourceRow::with_id("11", "x"))
            .expect_err("duplicate row must fail");
        assert!(matches!(err, BoardError::DuplicateRow(id) if id == "11"));
    }

    #[test]
    fn hide_row_keeps_single_hidden_row() {
        let mut repo = Repository::new(board());
        assert!(repo.hide_row("11"));
        assert!(repo.hide_row("21"));

        let hidden: Vec<&str> = repo
            .columns()
            .iter()
            .flat_map(|column| column.rows())
            .filter(|row| row.is_hidden())
            .map(|row| row.id())
            .collect();
        assert_eq!(hidden, vec!["21"]);
        assert!(!repo.hide_row("missing"));

        assert!(repo.show_row("21"));
        assert!(repo.find_row("21").is_some_and(|row| !row.is_hidden()));
    }

    #[test]
    fn column_mutations_request_reload() {
        let reloads = Rc::new(RefCell::new(0));
        let mut repo = Repository::new(board());
        let counter = reloads.clone();
        repo.set_reload(move || *counter.borrow_mut() += 1);

        repo.add_column(SourceColumn::with_id("3", "Later"))
            .expect("new column should be added");
        assert!(repo.delete_column("1"));
        assert!(!repo.delete_column("1"));

        assert_eq!(*reloads.borrow(), 2);
        assert_eq!(repo.columns()[0].id(), "2");
        assert_eq!(repo.columns()[0].index(), 0);
        assert_eq!(repo.columns()[1].index(), 1);
    }

    #[test]
    fn add_column_rejects_duplicates() {
        let mut repo = Repository::new(board());
        let err = repo
            .add_column(SourceColumn::with_id("1", "Again"))
            .expect_err("duplicate column must fail");
        assert!(matches!(err, BoardError::DuplicateColumn(_)));

        let err = repo
            .add_column(SourceColumn::with_id("3", "New").with_row(SourceRow::with_id("21", "dup")))
            .expect_err("duplicate row must fail");
        assert!(matches!(err, BoardError::DuplicateRow(_)));
    }
}
