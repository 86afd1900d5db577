//! Transformations between light curve representations.
//!
//! Resampling to a uniform grid, trend removal, phase folding, and display
//! downsampling.
//!
//! # Example
//!
//! ```
//! use transitscan::config::{DetrendConfig, ResampleConfig};
//! use transitscan::core::LightCurve;
//! use transitscan::transform::{detrend, resample};
//!
//! let time: Vec<f64> = (0..100).map(|i| i as f64 / 24.0).collect();
//! let curve = LightCurve::new(time, vec![1.0; 100]).unwrap();
//!
//! let grid = resample(&curve, &ResampleConfig::default()).unwrap();
//! let series = detrend(&grid, &DetrendConfig::default()).unwrap();
//! assert!(series.residual().iter().all(|r| r.abs() < 1e-12));
//! ```

pub mod binning;
pub mod detrend;
pub mod fold;
pub mod resample;
pub mod window;

pub use binning::{bin_for_display, BinnedCurve};
pub use detrend::{detrend, estimate_trend, median_filter, savgol_filter, Trend};
pub use fold::{choose_period, fold, FoldedCurve};
pub use resample::{grid_len, interpolate_gaps, resample};
pub use window::rolling_median;
