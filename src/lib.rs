//! # transitscan
//!
//! Light curve preprocessing and transit candidate detection.
//!
//! Takes irregularly sampled stellar photometry from one or more sources,
//! cleans and resamples it onto an hourly grid, removes the slow stellar
//! trend, and searches the residual for dips. Provides observing-segment
//! detection, peak-based transit candidates with clustering, a coarse
//! anomaly-region heuristic with a period guess, and phase folding.

pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use error::{LightCurveError, Result};
pub use pipeline::{analyze, Analysis, Pipeline};

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::core::{DetrendedSeries, LightCurve, UniformGrid};
    pub use crate::detection::{AnomalyRegion, Segment, TransitCandidate};
    pub use crate::error::{LightCurveError, Result};
    pub use crate::pipeline::{analyze, Analysis, Pipeline};
    pub use crate::transform::FoldedCurve;
}
