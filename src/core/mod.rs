pub mod coordinate;
pub mod dataset;
pub mod types;

pub use coordinate::{
    IndexRange, MIN_LINE_LENGTH, ViewportState, axial_shift, compute_line_length,
    index_range_to_pixel_range, line_length_for_window, max_value_in_range, nice_ceil,
    pixel_range_to_index_range, segment_length,
};
pub use dataset::{Dataset, RawChartData, Series, SeriesKind, Visibility};
pub use types::{PlotPadding, PointerPosition, Viewport};
