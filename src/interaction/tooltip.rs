use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Dataset, ViewportState, Visibility};
use crate::render::Color;

/// Value of one visible line at the hovered index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipEntry {
    pub series_id: String,
    pub display_name: String,
    pub value: f64,
    pub color: Color,
}

/// Hovered sample with its values sorted from highest to lowest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipSelection {
    pub index: usize,
    /// Axis sample at `index` (timestamp); formatting is left to the host.
    pub axis_value: f64,
    /// Main-surface x of the hovered sample, for the guide line.
    pub pixel_x: f64,
    pub entries: SmallVec<[TooltipEntry; 4]>,
}

/// Resolves a main-surface pointer x to a sample index.
///
/// `index = clamp(floor((x - left_padding) / line_length + from), 0, last_index)`.
/// Returns `None` when the pointer sits left of the first materialized sample.
#[must_use]
pub fn pointer_to_index(
    pointer_x: f64,
    left_padding: f64,
    viewport: &ViewportState,
    last_index: usize,
) -> Option<usize> {
    if !pointer_x.is_finite() {
        return None;
    }
    let raw = ((pointer_x - left_padding) / viewport.line_length + viewport.from).floor();
    if raw < viewport.from.floor() {
        return None;
    }
    Some((raw as usize).min(last_index))
}

/// Main-surface x of sample `index` under the current viewport.
#[must_use]
pub fn index_to_pixel_x(index: usize, left_padding: f64, viewport: &ViewportState) -> f64 {
    viewport.line_length * (index as f64 - viewport.from.floor()) + left_padding
        - viewport.axial_shift
}

/// Builds the tooltip for a pointer at `pointer_x` on the main surface.
///
/// Returns `None` when the pointer is outside the materialized window or no
/// line is visible, since an axis label alone carries nothing to compare.
#[must_use]
pub fn locate_tooltip(
    dataset: &Dataset,
    visibility: &Visibility,
    viewport: &ViewportState,
    pointer_x: f64,
    left_padding: f64,
) -> Option<TooltipSelection> {
    let index = pointer_to_index(pointer_x, left_padding, viewport, dataset.last_index())?;

    let mut entries: SmallVec<[TooltipEntry; 4]> = dataset
        .visible_lines(visibility)
        .filter_map(|series| {
            Some(TooltipEntry {
                series_id: series.id.clone(),
                display_name: series.display_name.clone(),
                value: *series.values.get(index)?,
                color: series.color?,
            })
        })
        .collect();

    // An axis label alone is not worth a tooltip.
    if entries.is_empty() {
        return None;
    }
    entries.sort_by_key(|entry| std::cmp::Reverse(OrderedFloat(entry.value)));

    Some(TooltipSelection {
        index,
        axis_value: dataset.axis().values[index],
        pixel_x: index_to_pixel_x(index, left_padding, viewport),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::{index_to_pixel_x, pointer_to_index};
    use crate::core::{IndexRange, ViewportState};

    #[test]
    fn pointer_left_of_plot_has_no_index() {
        let viewport = ViewportState::new(IndexRange::new(2.4, 4.0), 400.0, 25.0);
        assert_eq!(pointer_to_index(5.0, 20.0, &viewport, 4), None);
        assert_eq!(pointer_to_index(130.0, 20.0, &viewport, 4), Some(4));
    }

    #[test]
    fn index_pixel_accounts_for_axial_shift() {
        let viewport = ViewportState::new(IndexRange::new(2.4, 4.0), 400.0, 25.0);
        let x = index_to_pixel_x(3, 20.0, &viewport);
        assert!((x - 35.0).abs() <= 1e-9);
    }
}
