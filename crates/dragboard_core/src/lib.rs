//! Drag-and-drop reordering engine for column boards.
//! This crate owns board order and membership; hosts own rendering and
//! gesture capture.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod mover;
pub mod repo;
pub mod service;
pub mod utils;

pub use config::{BoardConfig, ConfigError};
pub use error::{BoardError, BoardResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingConfig};
pub use model::anchor::{
    measure_anchor, AnchorRef, FixedAnchor, LayoutAnchor, MeasureReply, Measurement,
    ScrollAnchor, ScrollAnchorRef,
};
pub use model::column::ColumnHandle;
pub use model::dragged::{DragKind, DraggedItem};
pub use model::geometry::{Rect, ScrollOffset};
pub use model::row::RowHandle;
pub use model::source::{SourceColumn, SourceRow};
pub use model::{ColumnId, RowId};
pub use mover::Mover;
pub use repo::board_repo::Repository;
pub use repo::listeners::{ColumnEvent, ListenerRegistry, EVENT_RELOAD};
pub use service::drag_session::{
    DragOutcome, DragSession, DragState, GestureEnd, GestureEvent, ScrollDirection,
    ScrollRequest, SessionEffect,
};
pub use utils::{device_height, device_viewport, device_width, set_device_viewport, Accessory, Viewport};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
