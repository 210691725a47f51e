//! Drag gesture state machine.
//!
//! # Responsibility
//! - Pick an item up, feed pointer samples to the store, and commit on
//!   release.
//! - Compute board autoscroll requests near the viewport's side edges.
//!
//! # Invariants
//! - States advance `Idle -> Armed -> Dragging -> Committing -> Idle`.
//! - Every terminal gesture (end, cancel, fail) commits the current order;
//!   there is no rollback.
//! - A `(0, 0)` pointer sample is treated as "no sample" and ignored.

use crate::config::BoardConfig;
use crate::model::dragged::{DragKind, DraggedItem};
use crate::model::geometry::Rect;
use crate::model::{ColumnId, RowId};
use crate::repo::board_repo::Repository;
use crate::utils::Viewport;
use log::{debug, info};

/// Lifecycle of one drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Armed,
    Dragging,
    Committing,
}

/// How the gesture terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEnd {
    End,
    Cancel,
    Fail,
}

/// Gesture stream as delivered by the host's recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Update { x: f64, y: f64 },
    End,
    Cancel,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Board scroll position the host should animate to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub offset: f64,
    pub direction: ScrollDirection,
}

/// Summary of a committed drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    pub kind: DragKind,
    pub item_id: RowId,
    pub from_column_id: ColumnId,
    pub to_column_id: ColumnId,
    pub index: usize,
    pub end: GestureEnd,
}

/// What the host has to do after [`DragSession::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    None,
    /// Scroll the board, then re-measure columns.
    Scroll(ScrollRequest),
    Dropped(DragOutcome),
}

/// Drives one board's drags.
#[derive(Debug, Clone)]
pub struct DragSession {
    config: BoardConfig,
    viewport: Viewport,
    state: DragState,
    dragged: Option<DraggedItem>,
    scroll_offset: f64,
}

impl DragSession {
    pub fn new(config: BoardConfig, viewport: Viewport) -> Self {
        Self {
            config,
            viewport,
            state: DragState::Idle,
            dragged: None,
            scroll_offset: 0.0,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn dragged(&self) -> Option<&DraggedItem> {
        self.dragged.as_ref()
    }

    /// Board scrolling is disabled while an item is held.
    pub fn scroll_enabled(&self) -> bool {
        self.state == DragState::Idle
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Tracks the board scroll position reported by the host.
    pub fn on_board_scroll(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    /// Hides the row, measures it, and arms the session with its snapshot.
    ///
    /// Returns `false` when a drag is already active or the row is unknown.
    pub async fn pick_up_row<C, R>(&mut self, repo: &mut Repository<C, R>, row_id: &str) -> bool {
        if self.state != DragState::Idle {
            return false;
        }
        let Some(column_id) = repo.find_row(row_id).map(|row| row.column_id().to_string())
        else {
            return false;
        };

        repo.hide_row(row_id);
        repo.update_row_layout(&column_id, row_id).await;
        let Some(row) = repo.find_row(row_id) else {
            return false;
        };
        self.arm(DraggedItem::from_row(row));
        true
    }

    /// Column counterpart of [`DragSession::pick_up_row`].
    pub async fn pick_up_column<C, R>(
        &mut self,
        repo: &mut Repository<C, R>,
        column_id: &str,
    ) -> bool {
        if self.state != DragState::Idle || !repo.hide_column(column_id) {
            return false;
        }
        repo.update_column_layout(column_id).await;
        let Some(column) = repo.column(column_id) else {
            return false;
        };
        self.arm(DraggedItem::from_column(column));
        true
    }

    fn arm(&mut self, dragged: DraggedItem) {
        info!(
            "event=drag_start module=drag_session status=ok kind={:?} item={} column={}",
            dragged.kind, dragged.id, dragged.column_id
        );
        self.dragged = Some(dragged);
        self.state = DragState::Armed;
    }

    /// Feeds one pointer sample to the store.
    ///
    /// Returns a scroll request when the pointer is over a column and close to
    /// a side edge of the viewport.
    pub fn update<C, R>(&mut self, repo: &mut Repository<C, R>, x: f64, y: f64) -> Option<ScrollRequest> {
        if x == 0.0 && y == 0.0 {
            return None;
        }
        if !matches!(self.state, DragState::Armed | DragState::Dragging) {
            return None;
        }
        let dragged = self.dragged.as_mut()?;
        self.state = DragState::Dragging;

        let over_column = match dragged.kind {
            DragKind::Row => repo
                .move_row(dragged, x, y, |from, to| {
                    debug!(
                        "event=drag_column_change module=drag_session status=ok from={from} to={to}"
                    );
                })
                .is_some(),
            DragKind::Column => repo.move_column(dragged, x, y).is_some(),
        };
        if !over_column {
            return None;
        }
        self.autoscroll(x)
    }

    fn autoscroll(&mut self, x: f64) -> Option<ScrollRequest> {
        let threshold = self.config.x_scroll_threshold;
        let factor = self.config.drag_speed_factor;

        let request = if x + threshold > self.viewport.width {
            self.scroll_offset += self.config.scroll_step;
            ScrollRequest {
                offset: self.scroll_offset * factor,
                direction: ScrollDirection::Forward,
            }
        } else if x < threshold {
            self.scroll_offset -= self.config.scroll_step;
            ScrollRequest {
                offset: self.scroll_offset / factor,
                direction: ScrollDirection::Backward,
            }
        } else {
            return None;
        };

        debug!(
            "event=autoscroll module=drag_session status=ok direction={:?} offset={}",
            request.direction, request.offset
        );
        Some(request)
    }

    /// Commits the current order, shows the item again and returns to idle.
    ///
    /// Returns `None` when no drag was active.
    pub fn finish<C: Clone, R: Clone>(
        &mut self,
        repo: &mut Repository<C, R>,
        end: GestureEnd,
    ) -> Option<DragOutcome> {
        let dragged = self.dragged.take()?;
        self.state = DragState::Committing;

        repo.update_original_data();
        match dragged.kind {
            DragKind::Row => repo.show_row(&dragged.id),
            DragKind::Column => repo.show_column(&dragged.id),
        };
        self.state = DragState::Idle;

        info!(
            "event=drag_end module=drag_session status=ok end={:?} item={} from={} to={} index={}",
            end, dragged.id, dragged.origin_column_id, dragged.column_id, dragged.index
        );
        Some(DragOutcome {
            kind: dragged.kind,
            item_id: dragged.id,
            from_column_id: dragged.origin_column_id,
            to_column_id: dragged.column_id,
            index: dragged.index,
            end,
        })
    }

    /// Routes one gesture event.
    pub fn handle<C: Clone, R: Clone>(
        &mut self,
        repo: &mut Repository<C, R>,
        event: GestureEvent,
    ) -> SessionEffect {
        let end = match event {
            GestureEvent::Update { x, y } => {
                return self
                    .update(repo, x, y)
                    .map_or(SessionEffect::None, SessionEffect::Scroll);
            }
            GestureEvent::End => GestureEnd::End,
            GestureEvent::Cancel => GestureEnd::Cancel,
            GestureEvent::Fail => GestureEnd::Fail,
        };
        self.finish(repo, end)
            .map_or(SessionEffect::None, SessionEffect::Dropped)
    }

    /// Rectangle for the floating copy of the held item, lifted by the
    /// vertical scroll threshold.
    pub fn hover_frame<C, R>(&self, repo: &Repository<C, R>) -> Option<Rect> {
        let dragged = self.dragged.as_ref()?;
        let layout = match dragged.kind {
            DragKind::Row => repo.find_row(&dragged.id)?.layout()?,
            DragKind::Column => repo.column(&dragged.id)?.layout()?,
        };
        Some(Rect {
            y: layout.y - self.config.y_scroll_threshold,
            ..layout
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DragSession, DragState, GestureEnd, GestureEvent, ScrollDirection, SessionEffect};
    use crate::config::BoardConfig;
    use crate::model::anchor::FixedAnchor;
    use crate::model::geometry::Rect;
    use crate::model::source::{SourceColumn, SourceRow};
    use crate::repo::board_repo::Repository;
    use crate::utils::Viewport;

    async fn single_column(column: Rect) -> Repository<(), ()> {
        let mut repo = Repository::new(vec![SourceColumn::with_id("1", ())
            .with_row(SourceRow::with_id("11", ()))
            .with_row(SourceRow::with_id("12", ()))]);
        repo.update_column_ref("1", Some(FixedAnchor::shared(column)));
        repo.update_row_ref(
            "1",
            "11",
            Some(FixedAnchor::shared(Rect::new(column.x, 0.0, column.width, 50.0))),
        );
        repo.update_row_ref(
            "1",
            "12",
            Some(FixedAnchor::shared(Rect::new(column.x, 50.0, column.width, 50.0))),
        );
        repo.measure_columns_layout().await;
        repo
    }

    #[tokio::test]
    async fn idle_session_ignores_samples_and_ends() {
        let mut repo = single_column(Rect::new(0.0, 0.0, 100.0, 300.0)).await;
        let mut session = DragSession::new(BoardConfig::default(), Viewport::new(400.0, 800.0));

        assert_eq!(session.update(&mut repo, 60.0, 20.0), None);
        assert_eq!(session.handle(&mut repo, GestureEvent::End), SessionEffect::None);
        assert!(session.scroll_enabled());
    }

    #[tokio::test]
    async fn pick_up_arms_and_zero_sample_is_ignored() {
        let mut repo = single_column(Rect::new(0.0, 0.0, 100.0, 300.0)).await;
        let mut session = DragSession::new(BoardConfig::default(), Viewport::new(400.0, 800.0));

        assert!(session.pick_up_row(&mut repo, "11").await);
        assert_eq!(session.state(), DragState::Armed);
        assert!(!session.scroll_enabled());
        assert!(repo.find_row("11").is_some_and(|row| row.is_hidden()));
        assert!(!session.pick_up_row(&mut repo, "12").await);

        assert_eq!(session.update(&mut repo, 0.0, 0.0), None);
        assert_eq!(session.state(), DragState::Armed);

        let hover = session.hover_frame(&repo).expect("held row is measured");
        assert_eq!(hover, Rect::new(0.0, -50.0, 100.0, 50.0));
    }

    #[tokio::test]
    async fn autoscroll_near_side_edges() {
        let mut repo = single_column(Rect::new(150.0, 0.0, 100.0, 300.0)).await;
        let config = BoardConfig {
            drag_speed_factor: 2.0,
            ..BoardConfig::default()
        };
        let mut session = DragSession::new(config, Viewport::new(200.0, 800.0));
        assert!(session.pick_up_row(&mut repo, "11").await);

        let forward = session
            .update(&mut repo, 170.0, 20.0)
            .expect("right edge scrolls");
        assert_eq!(forward.direction, ScrollDirection::Forward);
        assert_eq!(forward.offset, 16.0);
        assert_eq!(session.state(), DragState::Dragging);

        // Outside every column: no scroll even near the edge.
        assert_eq!(session.update(&mut repo, 190.0, 900.0), None);
        assert_eq!(session.scroll_offset(), 8.0);
    }

    #[tokio::test]
    async fn every_terminal_gesture_commits() {
        let ends = [
            (GestureEvent::End, GestureEnd::End),
            (GestureEvent::Cancel, GestureEnd::Cancel),
            (GestureEvent::Fail, GestureEnd::Fail),
        ];
        for (event, end) in ends {
            let mut repo = single_column(Rect::new(0.0, 0.0, 100.0, 300.0)).await;
            let mut session =
                DragSession::new(BoardConfig::default(), Viewport::new(400.0, 800.0));
            assert!(session.pick_up_row(&mut repo, "11").await);
            session.update(&mut repo, 60.0, 80.0);

            let SessionEffect::Dropped(outcome) = session.handle(&mut repo, event) else {
                panic!("terminal gesture must drop the row");
            };
            assert_eq!(outcome.index, 1);
            assert_eq!(outcome.end, end);
            assert_eq!(outcome.from_column_id, outcome.to_column_id);
            assert_eq!(repo.original_data()[0].row_ids(), vec!["12", "11"]);
            assert!(repo.find_row("11").is_some_and(|row| !row.is_hidden()));
            assert_eq!(session.state(), DragState::Idle);
        }
    }
}
