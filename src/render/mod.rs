mod frame;
mod null_renderer;
mod primitives;

pub use frame::{
    AxisLabelSlot, AxisTick, BrushOverlay, ChartFrame, SeriesPath, SurfaceFrame, TooltipMarker,
    TooltipOverlay,
};
pub use null_renderer::NullRenderer;
pub use primitives::Color;

use crate::error::ChartResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized `ChartFrame`, so paint code stays
/// isolated from viewport math and interaction state.
pub trait Renderer {
    fn render(&mut self, frame: &ChartFrame) -> ChartResult<()>;
}
