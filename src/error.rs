use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid canvas size: width={width}, height={height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("invalid margin: {0}")]
    InvalidMargin(String),

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid tick format: {0}")]
    InvalidFormat(String),

    #[error("render failed: {0}")]
    Render(String),
}
