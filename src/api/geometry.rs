//! Turns viewport state into the descriptors handed to a [`Renderer`].
//!
//! [`Renderer`]: crate::render::Renderer

use crate::core::{Series, ViewportState};
use crate::interaction::{BrushState, TooltipSelection};
use crate::render::{
    AxisLabelSlot, AxisTick, BrushOverlay, Color, SeriesPath, TooltipMarker, TooltipOverlay,
};

/// Samples drawn past `ceil(to)` so the line leaves the plot edge cleanly.
const TRAILING_SAMPLES: usize = 2;

/// Maps a sample value to a y pixel on a plot of `plot_height` scaled to `max_value`.
#[must_use]
pub fn value_to_y(value: f64, max_value: f64, plot_height: f64) -> f64 {
    if max_value <= 0.0 {
        return plot_height;
    }
    let y = plot_height - value / max_value * plot_height;
    if y.is_finite() { y } else { plot_height }
}

/// Polyline of one series on the main surface.
///
/// Starts early enough to fill the left padding and stops a couple of
/// samples past `ceil(to)`.
#[must_use]
pub fn main_series_path(
    series: &Series,
    color: Color,
    opacity: f64,
    state: &ViewportState,
    left_padding: f64,
    plot_height: f64,
    max_value: f64,
) -> SeriesPath {
    let first = state.range().first_index();
    let lead = (left_padding / state.line_length).ceil() as usize;
    let start = first.saturating_sub(lead);
    let last = series.values.len().saturating_sub(1);
    let end = ((state.to.ceil().max(0.0) as usize) + TRAILING_SAMPLES).min(last);

    let points = (start..=end)
        .filter_map(|index| {
            let value = *series.values.get(index)?;
            let x = state.line_length * (index as f64 - first as f64) + left_padding
                - state.axial_shift;
            Some((x, value_to_y(value, max_value, plot_height)))
        })
        .collect();

    SeriesPath {
        series_id: series.id.clone(),
        color,
        opacity,
        points,
    }
}

/// Polyline of one series across the whole preview strip.
#[must_use]
pub fn preview_series_path(
    series: &Series,
    color: Color,
    opacity: f64,
    line_length: f64,
    left_padding: f64,
    plot_height: f64,
    max_value: f64,
) -> SeriesPath {
    let points = series
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            (
                left_padding + line_length * index as f64,
                value_to_y(*value, max_value, plot_height),
            )
        })
        .collect();

    SeriesPath {
        series_id: series.id.clone(),
        color,
        opacity,
        points,
    }
}

/// Evenly spaced gridlines from the baseline up, labelled `ceil(max / count) * i`.
///
/// Lines sit half a pixel above the integer row so one-pixel strokes stay crisp.
#[must_use]
pub fn y_axis_ticks(max_value: f64, count: usize, plot_height: f64) -> Vec<AxisTick> {
    if max_value <= 0.0 || count == 0 {
        return Vec::new();
    }

    let step = (max_value / count as f64).ceil();
    let spacing = plot_height / count as f64;
    (0..count)
        .map(|i| {
            let value = step * i as f64;
            AxisTick {
                pixel_y: plot_height - i as f64 * spacing - 0.5,
                value,
                label_text: format!("{value}"),
            }
        })
        .collect()
}

/// X-axis label slots, thinned so labels `label_width` apart never overlap.
///
/// Slots are anchored to absolute indices, so labels do not jump while the
/// window pans.
#[must_use]
pub fn x_axis_label_slots(
    axis: &Series,
    state: &ViewportState,
    left_padding: f64,
    surface_width: f64,
    label_width: f64,
) -> Vec<AxisLabelSlot> {
    let divider = ((label_width / state.line_length).round() as usize).max(1);
    let first = state.range().first_index();
    let last = axis.values.len().saturating_sub(1);
    let end = ((state.to.ceil().max(0.0) as usize) + TRAILING_SAMPLES).min(last);

    (first..=end)
        .filter(|index| (index + 1) % divider == 0)
        .filter_map(|index| {
            let pixel_x = state.line_length * (index - first) as f64 + left_padding
                - state.axial_shift;
            (0.0..=surface_width)
                .contains(&pixel_x)
                .then(|| AxisLabelSlot {
                    pixel_x,
                    index,
                    axis_value: axis.values[index],
                })
        })
        .collect()
}

#[must_use]
pub fn brush_overlay(brush: BrushState, left_padding: f64) -> BrushOverlay {
    BrushOverlay {
        x: brush.panel_x + left_padding,
        width: brush.panel_width,
    }
}

/// Guide-line markers for every tooltip entry.
#[must_use]
pub fn tooltip_overlay(
    selection: &TooltipSelection,
    max_value: f64,
    plot_height: f64,
) -> TooltipOverlay {
    let markers = selection
        .entries
        .iter()
        .map(|entry| TooltipMarker {
            pixel_x: selection.pixel_x,
            pixel_y: value_to_y(entry.value, max_value, plot_height),
            color: entry.color,
        })
        .collect();

    TooltipOverlay {
        selection: selection.clone(),
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IndexRange;

    fn line(values: Vec<f64>) -> Series {
        Series::line("y0", "y0", Color::rgb(0.0, 0.0, 0.0), values)
    }

    #[test]
    fn y_ticks_follow_ceiled_step() {
        let ticks = y_axis_ticks(400.0, 6, 300.0);
        let labels: Vec<_> = ticks.iter().map(|t| t.label_text.as_str()).collect();
        assert_eq!(labels, vec!["0", "67", "134", "201", "268", "335"]);
        assert_eq!(ticks[0].pixel_y, 299.5);
        assert_eq!(ticks[1].pixel_y, 249.5);
        assert!(y_axis_ticks(0.0, 6, 300.0).is_empty());
    }

    #[test]
    fn main_path_subtracts_axial_shift() {
        let series = line(vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        let state = ViewportState::new(IndexRange::new(1.5, 3.5), 50.0, 10.0);
        let color = series.color.expect("color");
        let path = main_series_path(&series, color, 1.0, &state, 0.0, 100.0, 50.0);

        assert_eq!(path.points.first().map(|p| p.0), Some(-5.0));
        assert_eq!(path.points.len(), 5);
        assert_eq!(path.points[0].1, 80.0);
    }

    #[test]
    fn main_path_fills_left_padding() {
        let series = line(vec![1.0; 10]);
        let state = ViewportState::new(IndexRange::new(5.0, 7.0), 1.0, 10.0);
        let color = series.color.expect("color");
        let path = main_series_path(&series, color, 1.0, &state, 20.0, 100.0, 1.0);
        assert_eq!(path.points.first().map(|p| p.0), Some(0.0));
    }

    #[test]
    fn label_slots_are_thinned() {
        let axis = Series::axis("x", (0..20).map(f64::from).collect());
        let state = ViewportState::new(IndexRange::new(0.0, 19.0), 1.0, 35.0);
        let slots = x_axis_label_slots(&axis, &state, 0.0, 1_000.0, 140.0);
        let indices: Vec<_> = slots.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![3, 7, 11, 15, 19]);
    }

    #[test]
    fn empty_scale_pins_values_to_baseline() {
        assert_eq!(value_to_y(10.0, 0.0, 120.0), 120.0);
    }
}
