use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Malformed dataset input; fatal to the chart instance being built.
    #[error("dataset validation failed: {0}")]
    Validation(String),

    #[error("unknown line series: {0}")]
    UnknownSeries(String),
}
