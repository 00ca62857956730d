//! Conversions between data-index space and pixel space.
//!
//! Every function here is pure. Inputs are clamped rather than rejected,
//! since pointer-derived coordinates routinely overshoot surface bounds
//! during fast drags.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Dataset, Visibility};

/// Smallest line spacing handed out, keeps `line_length > 0` on zero-width surfaces.
pub const MIN_LINE_LENGTH: f64 = 1e-6;

/// Visible `[from, to]` window in fractional index units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexRange {
    pub from: f64,
    pub to: f64,
}

impl IndexRange {
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Whole dataset, `0..=last_index`.
    #[must_use]
    pub fn full(last_index: usize) -> Self {
        Self::new(0.0, last_index as f64)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.to - self.from
    }

    /// First sample index materialized by the window.
    #[must_use]
    pub fn first_index(self) -> usize {
        self.from.floor().max(0.0) as usize
    }
}

/// Published state of the main plot for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub from: f64,
    pub to: f64,
    pub max_value: f64,
    pub line_length: f64,
    pub axial_shift: f64,
}

impl ViewportState {
    #[must_use]
    pub fn new(range: IndexRange, max_value: f64, line_length: f64) -> Self {
        let line_length = line_length.max(MIN_LINE_LENGTH);
        Self {
            from: range.from,
            to: range.to,
            max_value,
            line_length,
            axial_shift: axial_shift(line_length, range.from),
        }
    }

    #[must_use]
    pub fn range(self) -> IndexRange {
        IndexRange::new(self.from, self.to)
    }
}

/// Pixel spacing between adjacent samples when `sample_count` samples span `pixel_width`.
///
/// The division is done once in floating point, so the remainder of an
/// integer split is spread across all segments and the last sample lands on
/// `pixel_width` exactly instead of drifting by whole pixels.
#[must_use]
pub fn segment_length(sample_count: usize, pixel_width: f64) -> f64 {
    let segments = sample_count.saturating_sub(1).max(1);
    (pixel_width / segments as f64).max(MIN_LINE_LENGTH)
}

/// Line spacing that fits the full dataset into `pixel_width`.
#[must_use]
pub fn compute_line_length(dataset: &Dataset, pixel_width: f64) -> f64 {
    segment_length(dataset.sample_count(), pixel_width)
}

/// Line spacing that fits `range` into `pixel_width` on the main plot.
#[must_use]
pub fn line_length_for_window(range: IndexRange, pixel_width: f64) -> f64 {
    let span = range.span();
    if span <= 0.0 || !span.is_finite() {
        return MIN_LINE_LENGTH;
    }
    (pixel_width / span).max(MIN_LINE_LENGTH)
}

/// Maximum visible sample over `[floor(from), ceil(to)]`, rounded up by [`nice_ceil`].
///
/// Returns 0 when no line series is visible.
#[must_use]
pub fn max_value_in_range(dataset: &Dataset, visibility: &Visibility, from: f64, to: f64) -> f64 {
    let last = dataset.last_index();
    let lo = (from.floor().max(0.0) as usize).min(last);
    let hi = (to.ceil().max(0.0) as usize).clamp(lo, last);

    let raw = dataset
        .visible_lines(visibility)
        .flat_map(|series| series.values[lo..=hi].iter().copied())
        .fold(f64::NEG_INFINITY, f64::max);

    if raw.is_finite() { nice_ceil(raw) } else { 0.0 }
}

/// Rounds `value` up to two significant digits.
///
/// `digits = ceil(log10(value + 1))` and the value is rounded up at
/// precision `-(digits - 2)`: 400 stays 400, 401 becomes 410, 253 becomes 260.
/// Non-positive input yields 0.
#[must_use]
pub fn nice_ceil(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }

    let digits = (value + 1.0).log10().ceil() as i32;
    let exponent = digits - 2;
    // Divide by whole powers of ten so already-round maxima stay exact.
    if exponent >= 0 {
        let step = 10f64.powi(exponent);
        (value / step).ceil() * step
    } else {
        let scale = 10f64.powi(-exponent);
        (value * scale).ceil() / scale
    }
}

/// Maps a brush rectangle on the preview strip to a visible index window.
///
/// The result always satisfies `0 <= from <= to <= last_index + 1` and spans
/// at least one whole index step, so two samples stay materialized.
#[must_use]
pub fn pixel_range_to_index_range(
    pixel_x: f64,
    pixel_width: f64,
    total_pixel_width: f64,
    line_length: f64,
    last_index: usize,
) -> IndexRange {
    let lines = last_index.max(1) as f64;
    if !is_positive(total_pixel_width) || !is_positive(line_length) {
        return IndexRange::full(last_index.max(1));
    }

    let ratio = lines * line_length / total_pixel_width;
    let raw_from = (pixel_x * ratio / line_length).max(0.0);
    let raw_to = ((pixel_x + pixel_width) * ratio / line_length).clamp(0.0, lines + 1.0);

    let from = if raw_from.is_finite() {
        raw_from.min(lines - 1.0)
    } else {
        0.0
    };
    let to = if raw_to.is_finite() { raw_to } else { lines };
    let to = to.max(from + 1.0).min(lines + 1.0);

    if from != raw_from || to != raw_to {
        debug!(
            raw_from,
            raw_to, from, to, "widened degenerate index window"
        );
    }
    IndexRange::new(from, to)
}

/// Inverse of [`pixel_range_to_index_range`]: returns `(pixel_x, pixel_width)`.
#[must_use]
pub fn index_range_to_pixel_range(
    range: IndexRange,
    total_pixel_width: f64,
    last_index: usize,
) -> (f64, f64) {
    let px_per_index = total_pixel_width / last_index.max(1) as f64;
    (range.from * px_per_index, range.span() * px_per_index)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Sub-pixel offset for a non-integer `from`, so panning slides instead of snapping.
#[must_use]
pub fn axial_shift(line_length: f64, from: f64) -> f64 {
    line_length * (from - from.floor())
}
