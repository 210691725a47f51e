//! Board-space geometry primitives.
//!
//! # Invariants
//! - All rectangles live in the same absolute coordinate space as pointer
//!   samples reported by the gesture layer.
//! - A rectangle is advisory: it reflects the last successful measurement and
//!   may be stale between measurement passes.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in absolute board coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict horizontal containment: `x > left && x < right`.
    pub fn spans_x(&self, x: f64) -> bool {
        x > self.x && x < self.right()
    }
}

/// Scroll correction applied to a viewport-relative measurement.
///
/// Zero on an axis means "no correction", matching the behavior of hosts that
/// pass no offset at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    pub const NONE: Self = Self { x: 0.0, y: 0.0 };

    pub const fn horizontal(x: f64) -> Self {
        Self { x, y: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn edges_follow_origin_and_size() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn horizontal_containment_is_strict() {
        let rect = Rect::new(0.0, 0.0, 100.0, 10.0);
        assert!(rect.spans_x(50.0));
        assert!(!rect.spans_x(0.0));
        assert!(!rect.spans_x(100.0));
    }
}
