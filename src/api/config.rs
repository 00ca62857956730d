use serde::{Deserialize, Serialize};

use crate::core::{PlotPadding, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{BrushConfig, DEFAULT_ANIMATION_DURATION, Easing};

/// Public chart bootstrap configuration.
///
/// Serializable so hosts can keep chart setup next to their data files.
/// Every field except the two viewports has a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub main_viewport: Viewport,
    pub preview_viewport: Viewport,
    #[serde(default)]
    pub padding: PlotPadding,
    #[serde(default)]
    pub brush: BrushConfig,
    /// Share of the index domain shown when the chart starts, anchored right.
    #[serde(default = "default_initial_window_fraction")]
    pub initial_window_fraction: f64,
    #[serde(default = "default_animation_duration")]
    pub animation_duration: f64,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default = "default_y_tick_count")]
    pub y_tick_count: usize,
    /// Horizontal room one x-axis label needs; drives label thinning.
    #[serde(default = "default_x_label_width")]
    pub x_label_width: f64,
}

impl ChartConfig {
    #[must_use]
    pub fn new(main_viewport: Viewport, preview_viewport: Viewport) -> Self {
        Self {
            main_viewport,
            preview_viewport,
            padding: PlotPadding::default(),
            brush: BrushConfig::default(),
            initial_window_fraction: default_initial_window_fraction(),
            animation_duration: default_animation_duration(),
            easing: Easing::default(),
            y_tick_count: default_y_tick_count(),
            x_label_width: default_x_label_width(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: PlotPadding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_brush_config(mut self, brush: BrushConfig) -> Self {
        self.brush = brush;
        self
    }

    #[must_use]
    pub fn with_initial_window_fraction(mut self, fraction: f64) -> Self {
        self.initial_window_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, duration: f64, easing: Easing) -> Self {
        self.animation_duration = duration;
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn with_y_tick_count(mut self, count: usize) -> Self {
        self.y_tick_count = count;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        for viewport in [self.main_viewport, self.preview_viewport] {
            if !viewport.is_valid() {
                return Err(ChartError::InvalidViewport {
                    width: viewport.width,
                    height: viewport.height,
                });
            }
        }

        let padding = self.padding;
        if [padding.left, padding.right, padding.bottom]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ChartError::InvalidData(
                "plot padding must be finite and >= 0".to_owned(),
            ));
        }
        if f64::from(self.main_viewport.height) <= padding.bottom {
            return Err(ChartError::InvalidData(
                "main viewport must be taller than the bottom padding".to_owned(),
            ));
        }

        if !self.brush.control_border_width.is_finite() || self.brush.control_border_width < 0.0 {
            return Err(ChartError::InvalidData(
                "brush control border width must be finite and >= 0".to_owned(),
            ));
        }
        if !self.brush.min_panel_width.is_finite() || self.brush.min_panel_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "brush minimum panel width must be finite and > 0".to_owned(),
            ));
        }
        if !self.initial_window_fraction.is_finite()
            || self.initial_window_fraction <= 0.0
            || self.initial_window_fraction > 1.0
        {
            return Err(ChartError::InvalidData(
                "initial window fraction must be in (0, 1]".to_owned(),
            ));
        }
        if !self.animation_duration.is_finite() || self.animation_duration < 0.0 {
            return Err(ChartError::InvalidData(
                "animation duration must be finite and >= 0".to_owned(),
            ));
        }
        if self.y_tick_count == 0 {
            return Err(ChartError::InvalidData(
                "y tick count must be > 0".to_owned(),
            ));
        }
        if !self.x_label_width.is_finite() || self.x_label_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "x label width must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }

    /// Data width of the main surface.
    #[must_use]
    pub fn main_plot_width(self) -> f64 {
        self.padding.inner_width(self.main_viewport)
    }

    /// Data height of the main surface, above the label gutter.
    #[must_use]
    pub fn main_plot_height(self) -> f64 {
        self.padding.inner_height(self.main_viewport)
    }

    #[must_use]
    pub fn preview_plot_width(self) -> f64 {
        self.padding.inner_width(self.preview_viewport)
    }
}

fn default_initial_window_fraction() -> f64 {
    0.25
}

fn default_animation_duration() -> f64 {
    DEFAULT_ANIMATION_DURATION
}

fn default_y_tick_count() -> usize {
    6
}

fn default_x_label_width() -> f64 {
    140.0
}

#[cfg(test)]
mod tests {
    use super::ChartConfig;
    use crate::core::{PlotPadding, Viewport};
    use crate::error::ChartError;
    use crate::interaction::{BrushConfig, Easing};

    #[test]
    fn json_fills_defaults() {
        let config = ChartConfig::from_json_str(
            r#"{"main_viewport":{"width":800,"height":400},"preview_viewport":{"width":800,"height":54}}"#,
        )
        .expect("valid config");
        assert_eq!(config.y_tick_count, 6);
        assert_eq!(config.animation_duration, 144.0);
        assert_eq!(config.padding.left, 20.0);
        assert_eq!(config.brush.control_border_width, 5.0);
    }

    #[test]
    fn zero_sized_viewport_is_rejected() {
        let err = ChartConfig::new(Viewport::new(0, 400), Viewport::new(800, 54))
            .validate()
            .expect_err("zero width");
        assert!(matches!(err, ChartError::InvalidViewport { .. }));
    }

    #[test]
    fn out_of_range_window_fraction_is_rejected() {
        let result = ChartConfig::new(Viewport::new(800, 400), Viewport::new(800, 54))
            .with_initial_window_fraction(1.5)
            .validate();
        assert!(matches!(result, Err(ChartError::InvalidData(_))));
    }

    #[test]
    fn tuned_config_survives_json() {
        let config = ChartConfig::new(Viewport::new(800, 400), Viewport::new(800, 54))
            .with_padding(PlotPadding {
                left: 10.0,
                right: 12.0,
                bottom: 30.0,
            })
            .with_brush_config(BrushConfig {
                control_border_width: 8.0,
                min_panel_width: 30.0,
            })
            .with_animation(200.0, Easing::Linear)
            .with_y_tick_count(4);

        let json = config.to_json_pretty().expect("serialize");
        let parsed = ChartConfig::from_json_str(&json).expect("parse");
        assert_eq!(parsed, config);
        assert_eq!(parsed.main_plot_width(), 778.0);
        assert_eq!(parsed.main_plot_height(), 370.0);
        assert_eq!(parsed.preview_plot_width(), 778.0);
    }
}
