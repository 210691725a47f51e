//! Visual anchors supplied by the rendering layer.
//!
//! # Responsibility
//! - Define the boundary through which the engine asks a rendered visual for
//!   its on-screen rectangle.
//! - Bound every measurement wait so a drag can never hang on an anchor that
//!   is not currently rendered.
//!
//! # Invariants
//! - `measure_anchor` always resolves within `timeout` (plus scheduling slack).
//! - A missing, silent, or dropped reply resolves to `None`, never an error.

use crate::model::geometry::{Rect, ScrollOffset};
use log::debug;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Raw measurement reported by a rendered visual.
///
/// `frame_*` are relative to the parent visual, `page_*` are viewport
/// coordinates. Only `page_*` and the size feed board geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurement {
    pub frame_x: f64,
    pub frame_y: f64,
    pub width: f64,
    pub height: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl Measurement {
    /// Builds a measurement whose page position equals the given rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            frame_x: 0.0,
            frame_y: 0.0,
            width: rect.width,
            height: rect.height,
            page_x: rect.x,
            page_y: rect.y,
        }
    }

    /// Converts to absolute board coordinates using a scroll correction.
    pub fn to_rect(&self, offset: ScrollOffset) -> Rect {
        Rect::new(
            self.page_x + offset.x,
            self.page_y + offset.y,
            self.width,
            self.height,
        )
    }
}

/// One-shot completion handed to an anchor for a single measurement.
pub struct MeasureReply {
    sender: oneshot::Sender<Measurement>,
}

impl MeasureReply {
    /// Completes the pending measurement. Late replies are discarded.
    pub fn send(self, measurement: Measurement) {
        let _ = self.sender.send(measurement);
    }
}

impl Debug for MeasureReply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasureReply")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

/// Rendered visual that can report its own screen rectangle.
///
/// Implementations may answer synchronously inside `measure` or keep the
/// reply and answer later from any thread.
pub trait LayoutAnchor: Send + Sync {
    fn measure(&self, reply: MeasureReply);
}

/// Scrollable list container bound to one column.
pub trait ScrollAnchor: Send + Sync {
    fn scroll_to_offset(&self, offset: f64);
}

/// Shared handle to a layout anchor.
pub type AnchorRef = Arc<dyn LayoutAnchor>;

/// Shared handle to a scroll anchor.
pub type ScrollAnchorRef = Arc<dyn ScrollAnchor>;

/// Asks `anchor` for its rectangle, waiting at most `timeout`.
///
/// With no anchor bound the call still waits `timeout` before reporting
/// failure, so callers observe the same latency as an unresponsive visual.
pub async fn measure_anchor(
    anchor: Option<AnchorRef>,
    offset: ScrollOffset,
    timeout: Duration,
) -> Option<Rect> {
    let Some(anchor) = anchor else {
        tokio::time::sleep(timeout).await;
        debug!("event=measure module=anchor status=skipped reason=unbound");
        return None;
    };

    let (sender, receiver) = oneshot::channel();
    anchor.measure(MeasureReply { sender });

    match tokio::time::timeout(timeout, receiver).await {
        Ok(Ok(measurement)) => Some(measurement.to_rect(offset)),
        Ok(Err(_)) => {
            debug!("event=measure module=anchor status=error reason=reply_dropped");
            None
        }
        Err(_) => {
            debug!(
                "event=measure module=anchor status=error reason=timeout timeout_ms={}",
                timeout.as_millis()
            );
            None
        }
    }
}

/// Anchor that always reports the same page rectangle.
///
/// Useful for headless hosts and replaying recorded layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAnchor {
    rect: Rect,
}

impl FixedAnchor {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn shared(rect: Rect) -> AnchorRef {
        Arc::new(Self::new(rect))
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl LayoutAnchor for FixedAnchor {
    fn measure(&self, reply: MeasureReply) {
        reply.send(Measurement::from_rect(self.rect));
    }
}
