use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    Dataset, IndexRange, PointerPosition, Viewport, ViewportState, Visibility,
    compute_line_length, index_range_to_pixel_range, line_length_for_window,
    max_value_in_range, pixel_range_to_index_range,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    AnimationTick, BrushController, BrushState, CancellationToken, CursorHint, RescaleAnimator,
    TooltipSelection, locate_tooltip, pointer_to_index,
};
use crate::render::{ChartFrame, Renderer};

use super::{ChartConfig, geometry};

/// Surface a pointer event is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    Main,
    Preview,
}

/// Whether the host should schedule another `on_frame` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameRequest {
    Continue,
    Stop,
}

/// Orchestrates brush, animator and tooltip for one chart instance.
///
/// The controller exclusively owns every piece of mutable state; the dataset
/// is shared read-only. All handlers run to completion synchronously, and
/// `now` is the host clock in the same unit as the animation duration.
///
/// While a brush gesture is active the host should keep forwarding pointer
/// events as `PointerTarget::Preview`, even when the pointer has left the
/// preview canvas, so fast drags are not dropped.
pub struct ChartController<R: Renderer> {
    renderer: R,
    config: ChartConfig,
    dataset: Arc<Dataset>,
    visibility: Visibility,
    brush: BrushController,
    animator: RescaleAnimator,
    viewport: ViewportState,
    preview_line_length: f64,
    tooltip: Option<TooltipSelection>,
    animation_token: Option<CancellationToken>,
    destroyed: bool,
}

impl<R: Renderer> ChartController<R> {
    /// Validates `config`, lays the chart out and paints the first frame.
    pub fn new(renderer: R, config: ChartConfig, dataset: Arc<Dataset>) -> ChartResult<Self> {
        let config = config.validate()?;
        let preview_width = config.preview_plot_width();
        let preview_line_length = compute_line_length(&dataset, preview_width);
        let brush = BrushController::new(config.brush, preview_width, 0.0, preview_width);

        let mut controller = Self {
            renderer,
            config,
            dataset,
            visibility: Visibility::default(),
            brush,
            animator: RescaleAnimator::new(config.animation_duration, config.easing, 0.0),
            viewport: ViewportState::new(IndexRange::new(0.0, 1.0), 0.0, 1.0),
            preview_line_length,
            tooltip: None,
            animation_token: None,
            destroyed: false,
        };
        controller.place_initial_window();
        debug!(
            samples = controller.dataset.sample_count(),
            from = controller.viewport.from,
            to = controller.viewport.to,
            max_value = controller.viewport.max_value,
            "chart initialized"
        );
        controller.render()?;
        Ok(controller)
    }

    #[must_use]
    pub fn config(&self) -> ChartConfig {
        self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    #[must_use]
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Viewport as currently displayed; `max_value` follows the animation.
    #[must_use]
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            max_value: self.animator.displayed_value(),
            ..self.viewport
        }
    }

    /// Rounded maximum of the visible window that the y axis converges to.
    #[must_use]
    pub fn target_max_value(&self) -> f64 {
        self.viewport.max_value
    }

    #[must_use]
    pub fn brush_state(&self) -> BrushState {
        self.brush.state()
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&TooltipSelection> {
        self.tooltip.as_ref()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    /// Token of the in-flight rescale animation, for hosts that cancel from outside.
    #[must_use]
    pub fn animation_token(&self) -> Option<&CancellationToken> {
        self.animation_token.as_ref()
    }

    #[must_use]
    pub fn series_opacity(&self, series_id: &str) -> f64 {
        self.animator.opacity(series_id)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn on_pointer_down(
        &mut self,
        target: PointerTarget,
        position: PointerPosition,
    ) -> CursorHint {
        if !self.accepts_pointer(position) || target != PointerTarget::Preview {
            return CursorHint::Default;
        }
        let x = position.x - self.config.padding.left;
        self.brush.pointer_down(x);
        self.brush.hover_hint(x)
    }

    /// Drives the brush gesture on the preview strip or the tooltip on the main plot.
    pub fn on_pointer_move(
        &mut self,
        target: PointerTarget,
        position: PointerPosition,
        now: f64,
    ) -> ChartResult<CursorHint> {
        if !self.accepts_pointer(position) {
            return Ok(CursorHint::Default);
        }

        match target {
            PointerTarget::Preview => {
                let x = position.x - self.config.padding.left;
                if self.brush.pointer_move(x).is_some() {
                    self.tooltip = None;
                    self.sync_viewport_from_brush(now);
                    self.render()?;
                }
                Ok(self.brush.hover_hint(x))
            }
            PointerTarget::Main => {
                if self.brush.is_dragging() {
                    return Ok(self.brush.hover_hint(position.x));
                }
                self.update_tooltip(position.x)?;
                Ok(CursorHint::Default)
            }
        }
    }

    /// Ends a brush gesture and commits the final window.
    ///
    /// A release over the main surface, or at a non-finite position, still
    /// ends the gesture; the panel keeps the geometry of the last preview move.
    pub fn on_pointer_up(
        &mut self,
        target: PointerTarget,
        position: PointerPosition,
        now: f64,
    ) -> ChartResult<CursorHint> {
        if self.destroyed {
            return Ok(CursorHint::Default);
        }
        if target != PointerTarget::Preview || !self.accepts_pointer(position) {
            self.brush.release();
            return Ok(CursorHint::Default);
        }
        let x = position.x - self.config.padding.left;
        if self.brush.pointer_up(x).is_some() {
            self.sync_viewport_from_brush(now);
            self.render()?;
        }
        Ok(self.brush.hover_hint(x))
    }

    /// Clears the tooltip once the pointer leaves the main plot.
    pub fn on_pointer_leave(&mut self, target: PointerTarget) -> ChartResult<()> {
        if target == PointerTarget::Main && self.tooltip.take().is_some() {
            trace!("tooltip cleared");
            self.render()?;
        }
        Ok(())
    }

    /// Re-lays the chart out for new surface sizes.
    ///
    /// Any in-flight animation is cancelled first; its geometry belongs to the
    /// old layout.
    pub fn on_resize(&mut self, main: Viewport, preview: Viewport) -> ChartResult<()> {
        let config = ChartConfig {
            main_viewport: main,
            preview_viewport: preview,
            ..self.config
        }
        .validate()?;

        self.cancel_animation();
        self.config = config;
        let preview_width = config.preview_plot_width();
        self.preview_line_length = compute_line_length(&self.dataset, preview_width);
        self.brush.set_preview_width(preview_width);
        self.tooltip = None;

        let range = self.brush_range();
        let max_value = self.window_max(range);
        self.viewport = ViewportState::new(
            range,
            max_value,
            line_length_for_window(range, config.main_plot_width()),
        );
        self.animator.jump_to(max_value);
        debug!(
            main_width = main.width,
            preview_width = preview.width,
            from = range.from,
            to = range.to,
            "chart resized"
        );
        self.render()
    }

    /// Shows or hides one line series and animates the rescale and fade.
    pub fn on_toggle_series(&mut self, series_id: &str, now: f64) -> ChartResult<()> {
        if !self.dataset.series(series_id).is_some_and(|s| s.is_line()) {
            return Err(ChartError::UnknownSeries(series_id.to_owned()));
        }

        let visible = self.visibility.toggle(series_id);
        let max_value = self.window_max(self.viewport.range());
        self.viewport.max_value = max_value;
        self.tooltip = None;

        let target_opacity = if visible { 1.0 } else { 0.0 };
        debug!(series_id, visible, max_value, "series toggled");
        self.start_animation(now, max_value, &[(series_id, target_opacity)]);
        self.render()
    }

    /// Advances the rescale animation; call once per host frame.
    pub fn on_frame(&mut self, now: f64) -> ChartResult<FrameRequest> {
        if self.destroyed {
            return Ok(FrameRequest::Stop);
        }

        match self.animator.tick(now) {
            AnimationTick::Running(_) => {
                self.render()?;
                Ok(FrameRequest::Continue)
            }
            AnimationTick::Finished(_) => {
                self.animation_token = None;
                self.render()?;
                Ok(FrameRequest::Stop)
            }
            AnimationTick::Cancelled => {
                self.animation_token = None;
                self.render()?;
                Ok(FrameRequest::Stop)
            }
            AnimationTick::Idle => Ok(FrameRequest::Stop),
        }
    }

    /// Swaps in a new dataset and restores the initial window.
    ///
    /// Hidden ids that still exist stay hidden.
    pub fn update_data(&mut self, dataset: Arc<Dataset>) -> ChartResult<()> {
        self.cancel_animation();
        let mut visibility = Visibility::default();
        for id in self.visibility.hidden() {
            if dataset.series(id).is_some_and(|s| s.is_line()) {
                visibility.toggle(id);
            }
        }
        self.visibility = visibility;
        self.dataset = dataset;
        self.preview_line_length =
            compute_line_length(&self.dataset, self.config.preview_plot_width());
        self.tooltip = None;
        self.place_initial_window();
        debug!(
            samples = self.dataset.sample_count(),
            "chart data replaced"
        );
        self.render()
    }

    /// Stops any in-flight animation; later frames and events are ignored.
    pub fn destroy(&mut self) {
        self.cancel_animation();
        self.destroyed = true;
        debug!("chart destroyed");
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Builds the frame for the current state without painting it.
    #[must_use]
    pub fn build_frame(&self) -> ChartFrame {
        let config = self.config;
        let padding = config.padding;
        let state = self.viewport_state();
        let main_height = config.main_plot_height();
        let preview_height = f64::from(config.preview_viewport.height);
        let preview_max = self.window_max(IndexRange::full(self.dataset.last_index()));

        let mut frame = ChartFrame::new(config.main_viewport, config.preview_viewport);
        for series in self.dataset.lines() {
            let opacity = self.animator.opacity(&series.id);
            let visible = self.visibility.is_visible(&series.id);
            if !visible && opacity <= 0.0 {
                continue;
            }
            let Some(color) = series.color else {
                continue;
            };
            frame.main.series.push(geometry::main_series_path(
                series,
                color,
                opacity,
                &state,
                padding.left,
                main_height,
                state.max_value,
            ));
            frame.preview.series.push(geometry::preview_series_path(
                series,
                color,
                opacity,
                self.preview_line_length,
                padding.left,
                preview_height,
                preview_max,
            ));
        }

        frame.y_ticks =
            geometry::y_axis_ticks(self.viewport.max_value, config.y_tick_count, main_height);
        frame.x_labels = geometry::x_axis_label_slots(
            self.dataset.axis(),
            &state,
            padding.left,
            f64::from(config.main_viewport.width),
            config.x_label_width,
        );
        frame.brush = geometry::brush_overlay(self.brush.state(), padding.left);
        frame.tooltip = self
            .tooltip
            .as_ref()
            .map(|selection| geometry::tooltip_overlay(selection, state.max_value, main_height));
        frame
    }

    fn render(&mut self) -> ChartResult<()> {
        if self.destroyed {
            return Ok(());
        }
        let frame = self.build_frame();
        self.renderer.render(&frame)
    }

    fn accepts_pointer(&self, position: PointerPosition) -> bool {
        if self.destroyed {
            return false;
        }
        if !position.is_finite() {
            warn!(x = position.x, y = position.y, "ignoring non-finite pointer position");
            return false;
        }
        true
    }

    fn update_tooltip(&mut self, pointer_x: f64) -> ChartResult<()> {
        let padding_left = self.config.padding.left;
        let state = self.viewport_state();
        let index = pointer_to_index(pointer_x, padding_left, &state, self.dataset.last_index());
        if index.is_some() && index == self.tooltip.as_ref().map(|t| t.index) {
            return Ok(());
        }

        let next = locate_tooltip(
            &self.dataset,
            &self.visibility,
            &state,
            pointer_x,
            padding_left,
        );
        if next.is_none() && self.tooltip.is_none() {
            return Ok(());
        }
        trace!(index = next.as_ref().map(|t| t.index), "tooltip moved");
        self.tooltip = next;
        self.render()
    }

    /// Anchors a window of `initial_window_fraction` of the domain to the right edge.
    fn place_initial_window(&mut self) {
        let last_index = self.dataset.last_index();
        let span = (last_index as f64 * self.config.initial_window_fraction).max(1.0);
        let range = IndexRange::new(last_index as f64 - span, last_index as f64);
        let (panel_x, panel_width) =
            index_range_to_pixel_range(range, self.config.preview_plot_width(), last_index);
        self.brush.set_panel(panel_x, panel_width);

        let range = self.brush_range();
        let max_value = self.window_max(range);
        self.viewport = ViewportState::new(
            range,
            max_value,
            line_length_for_window(range, self.config.main_plot_width()),
        );
        self.animator.jump_to(max_value);
        self.animator.reset_opacities();
        for series in self.dataset.lines() {
            let opacity = if self.visibility.is_visible(&series.id) {
                1.0
            } else {
                0.0
            };
            self.animator.set_opacity(&series.id, opacity);
        }
    }

    fn brush_range(&self) -> IndexRange {
        let brush = self.brush.state();
        pixel_range_to_index_range(
            brush.panel_x,
            brush.panel_width,
            self.brush.preview_width(),
            self.viewport.line_length,
            self.dataset.last_index(),
        )
    }

    fn window_max(&self, range: IndexRange) -> f64 {
        max_value_in_range(&self.dataset, &self.visibility, range.from, range.to)
    }

    fn sync_viewport_from_brush(&mut self, now: f64) {
        let range = self.brush_range();
        let max_value = self.window_max(range);
        self.viewport = ViewportState::new(
            range,
            max_value,
            line_length_for_window(range, self.config.main_plot_width()),
        );
        trace!(from = range.from, to = range.to, max_value, "viewport synced from brush");

        if max_value != self.animator.target_value() {
            self.start_animation(now, max_value, &[]);
        }
    }

    fn start_animation(&mut self, now: f64, target_value: f64, fades: &[(&str, f64)]) {
        let token = self.animator.start(now, target_value, fades);
        self.animation_token = Some(token);
    }

    fn cancel_animation(&mut self) {
        self.animator.cancel();
        self.animation_token = None;
    }
}
