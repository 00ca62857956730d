use serde::{Deserialize, Serialize};

/// Size of one drawing surface in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Horizontal insets and the bottom gutter reserved for x-axis labels.
///
/// Values are device pixels. Both surfaces share the horizontal insets so the
/// brush and the main plot line up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPadding {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for PlotPadding {
    fn default() -> Self {
        Self {
            left: 20.0,
            right: 20.0,
            bottom: 44.0,
        }
    }
}

impl PlotPadding {
    /// Width left for data once both horizontal insets are removed.
    #[must_use]
    pub fn inner_width(self, viewport: Viewport) -> f64 {
        (f64::from(viewport.width) - self.left - self.right).max(0.0)
    }

    /// Height left for data on the main surface once the label gutter is removed.
    #[must_use]
    pub fn inner_height(self, viewport: Viewport) -> f64 {
        (f64::from(viewport.height) - self.bottom).max(0.0)
    }
}

/// Pointer position normalized to device pixels relative to one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
