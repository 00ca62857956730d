use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::interaction::TooltipSelection;
use crate::render::Color;

/// Polyline for one series on one surface, in device pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPath {
    pub series_id: String,
    pub color: Color,
    pub opacity: f64,
    pub points: Vec<(f64, f64)>,
}

impl SeriesPath {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(ChartError::InvalidData(format!(
                "series `{}` opacity must be finite and in [0, 1]",
                self.series_id
            )));
        }
        if self
            .points
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ChartError::InvalidData(format!(
                "series `{}` has non-finite points",
                self.series_id
            )));
        }
        self.color.validate()
    }
}

/// Everything drawn on one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFrame {
    pub viewport: Viewport,
    pub series: Vec<SeriesPath>,
}

impl SurfaceFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            series: Vec::new(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for path in &self.series {
            path.validate()?;
        }
        Ok(())
    }
}

/// Horizontal gridline with its value label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub pixel_y: f64,
    pub value: f64,
    pub label_text: String,
}

/// Slot for one x-axis label; the host formats `axis_value` itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLabelSlot {
    pub pixel_x: f64,
    pub index: usize,
    pub axis_value: f64,
}

/// Selection rectangle on the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushOverlay {
    pub x: f64,
    pub width: f64,
}

/// Point marker drawn on a line at the hovered index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipMarker {
    pub pixel_x: f64,
    pub pixel_y: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipOverlay {
    pub selection: TooltipSelection,
    pub markers: Vec<TooltipMarker>,
}

/// Backend-agnostic scene for one paint request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub main: SurfaceFrame,
    pub preview: SurfaceFrame,
    pub y_ticks: Vec<AxisTick>,
    pub x_labels: Vec<AxisLabelSlot>,
    pub brush: BrushOverlay,
    pub tooltip: Option<TooltipOverlay>,
}

impl ChartFrame {
    #[must_use]
    pub fn new(main: Viewport, preview: Viewport) -> Self {
        Self {
            main: SurfaceFrame::new(main),
            preview: SurfaceFrame::new(preview),
            y_ticks: Vec::new(),
            x_labels: Vec::new(),
            brush: BrushOverlay {
                x: 0.0,
                width: 0.0,
            },
            tooltip: None,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.main.validate()?;
        self.preview.validate()?;

        if self.y_ticks.iter().any(|tick| !tick.pixel_y.is_finite()) {
            return Err(ChartError::InvalidData(
                "axis tick positions must be finite".to_owned(),
            ));
        }
        if self.x_labels.iter().any(|slot| !slot.pixel_x.is_finite()) {
            return Err(ChartError::InvalidData(
                "axis label positions must be finite".to_owned(),
            ));
        }
        if !self.brush.x.is_finite() || !self.brush.width.is_finite() || self.brush.width < 0.0 {
            return Err(ChartError::InvalidData(
                "brush overlay must be finite with width >= 0".to_owned(),
            ));
        }
        if let Some(tooltip) = &self.tooltip {
            for marker in &tooltip.markers {
                if !marker.pixel_x.is_finite() || !marker.pixel_y.is_finite() {
                    return Err(ChartError::InvalidData(
                        "tooltip markers must be finite".to_owned(),
                    ));
                }
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.main.series.is_empty() && self.preview.series.is_empty()
    }
}
