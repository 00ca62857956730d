mod config;
mod controller;
pub mod geometry;

pub use config::ChartConfig;
pub use controller::{ChartController, FrameRequest, PointerTarget};
