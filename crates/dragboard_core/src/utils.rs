//! Device metrics and small host-facing helpers.
//!
//! # Invariants
//! - The device viewport is recorded once per process; later writes are
//!   ignored.

use log::{info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

static DEVICE_VIEWPORT: OnceCell<Viewport> = OnceCell::new();

/// Visible window size in the same coordinate space as layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Records the device viewport. Returns `false` when one was already set.
pub fn set_device_viewport(viewport: Viewport) -> bool {
    match DEVICE_VIEWPORT.set(viewport) {
        Ok(()) => {
            info!(
                "event=viewport_set module=utils status=ok width={} height={}",
                viewport.width, viewport.height
            );
            true
        }
        Err(_) => {
            warn!("event=viewport_set module=utils status=ignored reason=already_set");
            false
        }
    }
}

pub fn device_viewport() -> Option<Viewport> {
    DEVICE_VIEWPORT.get().copied()
}

/// Device width, or `0` before the host recorded a viewport.
pub fn device_width() -> f64 {
    device_viewport().map_or(0.0, |viewport| viewport.width)
}

/// Device height, or `0` before the host recorded a viewport.
pub fn device_height() -> f64 {
    device_viewport().map_or(0.0, |viewport| viewport.height)
}

/// Host-supplied decoration that is either a ready value or a render
/// function producing one.
pub enum Accessory<T> {
    Value(T),
    Render(Box<dyn Fn() -> T>),
}

impl<T> Accessory<T> {
    pub fn render<F>(render: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self::Render(Box::new(render))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Render(_))
    }

    /// Calls the render function, or clones the stored value.
    pub fn resolve(&self) -> T
    where
        T: Clone,
    {
        match self {
            Self::Value(value) => value.clone(),
            Self::Render(render) => render(),
        }
    }
}

impl<T: Debug> Debug for Accessory<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Render(_) => f.write_str("Render(<fn>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{device_height, device_viewport, device_width, set_device_viewport, Accessory, Viewport};

    #[test]
    fn first_viewport_wins() {
        let first = Viewport::new(390.0, 844.0);
        let accepted = set_device_viewport(first);
        let second = set_device_viewport(Viewport::new(1.0, 1.0));

        assert!(!second);
        let active = device_viewport().expect("viewport should be recorded");
        if accepted {
            assert_eq!(active, first);
        }
        assert_eq!(device_width(), active.width);
        assert_eq!(device_height(), active.height);
    }

    #[test]
    fn accessory_distinguishes_values_from_render_functions() {
        let value = Accessory::Value("plus");
        let render = Accessory::render(|| "rendered");

        assert!(!value.is_function());
        assert!(render.is_function());
        assert_eq!(value.resolve(), "plus");
        assert_eq!(render.resolve(), "rendered");
        assert_eq!(format!("{render:?}"), "Render(<fn>)");
    }
}
