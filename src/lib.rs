//! brush-chart: viewport and interaction engine for a windowed time-series chart.
//!
//! A main line plot follows a brush (selection window) on a miniature preview
//! strip. The crate owns the math and state machines behind it: index/pixel
//! mapping, brush dragging and resizing, eased y-axis rescaling and tooltip
//! lookup. Drawing is delegated to a [`render::Renderer`] that receives
//! fully materialized frames.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartController};
pub use error::{ChartError, ChartResult};
