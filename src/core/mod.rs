//! Core data structures for light curve analysis.

mod light_curve;
mod series;

pub use light_curve::{LightCurve, Sample};
pub use series::{DetrendedSeries, TrendFilter, UniformGrid, MIN_GRID_POINTS};
