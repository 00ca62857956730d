use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Gesture currently driving the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DragMode {
    #[default]
    Idle,
    Moving,
    ResizingLeft,
    ResizingRight,
}

/// Cursor the host should show over the preview strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorHint {
    Default,
    Grab,
    Grabbing,
    ColResize,
}

/// Public brush geometry in preview-plot pixels (left padding excluded).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushState {
    pub panel_x: f64,
    pub panel_width: f64,
    pub drag_mode: DragMode,
    /// Pointer x recorded at pointer-down; `None` while idle.
    pub drag_anchor: Option<f64>,
}

impl BrushState {
    #[must_use]
    pub fn right_edge(self) -> f64 {
        self.panel_x + self.panel_width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    panel_x: f64,
    panel_width: f64,
}

/// Tuning for brush hit-testing and size limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushConfig {
    /// Half-width of the grab zone around each panel edge.
    pub control_border_width: f64,
    pub min_panel_width: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            control_border_width: 5.0,
            min_panel_width: 20.0,
        }
    }
}

/// State machine behind the draggable selection window on the preview strip.
///
/// Coordinates are relative to the left edge of the preview plot area. The
/// panel is kept inside `[0, preview_width]` and never narrower than the
/// configured minimum; pointer input is clamped, never rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushController {
    config: BrushConfig,
    preview_width: f64,
    state: BrushState,
    origin: Option<DragOrigin>,
}

impl BrushController {
    #[must_use]
    pub fn new(config: BrushConfig, preview_width: f64, panel_x: f64, panel_width: f64) -> Self {
        let mut brush = Self {
            config,
            preview_width: preview_width.max(0.0),
            state: BrushState {
                panel_x: 0.0,
                panel_width: 0.0,
                drag_mode: DragMode::Idle,
                drag_anchor: None,
            },
            origin: None,
        };
        brush.set_panel(panel_x, panel_width);
        brush
    }

    #[must_use]
    pub fn state(&self) -> BrushState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> BrushConfig {
        self.config
    }

    #[must_use]
    pub fn preview_width(&self) -> f64 {
        self.preview_width
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.drag_mode != DragMode::Idle
    }

    /// Minimum width actually enforced; a strip narrower than the configured
    /// minimum is selected whole.
    #[must_use]
    pub fn effective_min_width(&self) -> f64 {
        self.config.min_panel_width.min(self.preview_width)
    }

    /// Places the panel, clamping it into the strip.
    pub fn set_panel(&mut self, panel_x: f64, panel_width: f64) {
        let (x, width) = self.clamp_panel(panel_x, panel_width);
        self.state.panel_x = x;
        self.state.panel_width = width;
    }

    /// Rescales the panel proportionally to a new strip width and drops any drag.
    pub fn set_preview_width(&mut self, preview_width: f64) {
        let preview_width = preview_width.max(0.0);
        let scale = if self.preview_width > 0.0 {
            preview_width / self.preview_width
        } else {
            1.0
        };
        let (x, width) = (self.state.panel_x * scale, self.state.panel_width * scale);
        self.preview_width = preview_width;
        self.reset_drag();
        self.set_panel(x, width);
        debug!(
            preview_width,
            panel_x = self.state.panel_x,
            panel_width = self.state.panel_width,
            "brush rescaled to new preview width"
        );
    }

    /// Classifies what a pointer-down at `x` would start.
    #[must_use]
    pub fn hit_test(&self, x: f64) -> DragMode {
        let left = self.state.panel_x;
        let right = self.state.right_edge();
        let border = self.config.control_border_width;
        let to_left = (x - left).abs();
        let to_right = (x - right).abs();

        if to_left.min(to_right) <= border {
            if to_left <= to_right {
                DragMode::ResizingLeft
            } else {
                DragMode::ResizingRight
            }
        } else if x > left && x < right {
            DragMode::Moving
        } else {
            DragMode::Idle
        }
    }

    #[must_use]
    pub fn hover_hint(&self, x: f64) -> CursorHint {
        let mode = if self.is_dragging() {
            self.state.drag_mode
        } else {
            self.hit_test(x)
        };
        match (mode, self.is_dragging()) {
            (DragMode::Idle, _) => CursorHint::Default,
            (DragMode::Moving, false) => CursorHint::Grab,
            (DragMode::Moving, true) => CursorHint::Grabbing,
            (DragMode::ResizingLeft | DragMode::ResizingRight, _) => CursorHint::ColResize,
        }
    }

    /// Starts a gesture. Returns `false` when `x` misses the panel or a drag is
    /// already in progress.
    pub fn pointer_down(&mut self, x: f64) -> bool {
        if self.is_dragging() {
            return false;
        }
        let mode = self.hit_test(x);
        if mode == DragMode::Idle {
            return false;
        }

        self.state.drag_mode = mode;
        self.state.drag_anchor = Some(x);
        self.origin = Some(DragOrigin {
            panel_x: self.state.panel_x,
            panel_width: self.state.panel_width,
        });
        debug!(?mode, anchor = x, "brush drag started");
        true
    }

    /// Applies pointer movement to the active gesture.
    ///
    /// Returns the new state when the panel geometry changed.
    pub fn pointer_move(&mut self, x: f64) -> Option<BrushState> {
        let before = self.state;
        self.apply_drag(x)?;
        trace!(
            panel_x = self.state.panel_x,
            panel_width = self.state.panel_width,
            "brush dragged"
        );
        (before.panel_x != self.state.panel_x || before.panel_width != self.state.panel_width)
            .then_some(self.state)
    }

    /// Ends the active gesture at `x` and commits the final geometry.
    ///
    /// Returns `None` when no gesture was active.
    pub fn pointer_up(&mut self, x: f64) -> Option<BrushState> {
        self.apply_drag(x)?;
        let mode = self.state.drag_mode;
        self.reset_drag();
        debug!(
            ?mode,
            panel_x = self.state.panel_x,
            panel_width = self.state.panel_width,
            "brush drag committed"
        );
        Some(self.state)
    }

    /// Ends the active gesture at the current geometry, for releases outside
    /// the preview strip whose x has no meaning in strip coordinates.
    ///
    /// Returns `None` when no gesture was active.
    pub fn release(&mut self) -> Option<BrushState> {
        if !self.is_dragging() {
            return None;
        }
        let mode = self.state.drag_mode;
        self.reset_drag();
        debug!(
            ?mode,
            panel_x = self.state.panel_x,
            panel_width = self.state.panel_width,
            "brush drag released off strip"
        );
        Some(self.state)
    }

    fn apply_drag(&mut self, x: f64) -> Option<()> {
        let anchor = self.state.drag_anchor?;
        let origin = self.origin?;
        let delta = x - anchor;
        let min_width = self.effective_min_width();

        let (panel_x, panel_width) = match self.state.drag_mode {
            DragMode::Idle => return None,
            DragMode::Moving => (
                clamp_between(
                    origin.panel_x + delta,
                    0.0,
                    self.preview_width - origin.panel_width,
                ),
                origin.panel_width,
            ),
            DragMode::ResizingLeft => {
                let right = origin.panel_x + origin.panel_width;
                let left = clamp_between(origin.panel_x + delta, 0.0, right - min_width);
                (left, right - left)
            }
            DragMode::ResizingRight => {
                let left = origin.panel_x;
                let right = clamp_between(
                    left + origin.panel_width + delta,
                    left + min_width,
                    self.preview_width,
                );
                (left, right - left)
            }
        };

        self.set_panel(panel_x, panel_width);
        Some(())
    }

    fn reset_drag(&mut self) {
        self.state.drag_mode = DragMode::Idle;
        self.state.drag_anchor = None;
        self.origin = None;
    }

    fn clamp_panel(&self, panel_x: f64, panel_width: f64) -> (f64, f64) {
        let width = clamp_between(
            finite_or(panel_width, self.preview_width),
            self.effective_min_width(),
            self.preview_width,
        );
        let x = clamp_between(finite_or(panel_x, 0.0), 0.0, self.preview_width - width);
        (x, width)
    }
}

/// Like `f64::clamp`, but resolves an inverted interval to `max` instead of panicking.
fn clamp_between(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
