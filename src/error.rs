//! Error types for the transitscan library.

use thiserror::Error;

/// Result type alias for light curve operations.
pub type Result<T> = std::result::Result<T, LightCurveError>;

/// Errors that can occur while preparing or analyzing a light curve.
///
/// Empty detections are not errors: detectors return empty vectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightCurveError {
    /// No input sources were supplied.
    #[error("empty input data")]
    EmptyData,

    /// Too few usable samples for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Parallel time and flux arrays differ in length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A uniform grid cannot be built from the samples.
    #[error("degenerate series: {0}")]
    DegenerateSeries(String),

    /// Neither the median filter nor the smoothing fallback could run.
    #[error("trend filter failure: {0}")]
    FilterFailure(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration text could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for LightCurveError {
    fn from(err: serde_json::Error) -> Self {
        LightCurveError::Config(err.to_string())
    }
}
