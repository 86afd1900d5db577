//! Display downsampling.
//!
//! Long curves are reduced to roughly a target number of points by
//! averaging consecutive chunks. This is for plotting only; detectors always
//! see the full-resolution data.

use serde::Serialize;

use crate::config::BinningConfig;
use crate::error::{LightCurveError, Result};
use crate::utils::stats::mean;

/// A downsampled curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedCurve {
    /// Mean time per chunk.
    pub time: Vec<f64>,
    /// Mean flux per chunk.
    pub flux: Vec<f64>,
}

impl BinnedCurve {
    /// Number of binned points.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the binned curve is empty.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Chunk size that brings `n` points down to at most `target` chunks.
pub fn chunk_size(n: usize, target: usize) -> usize {
    if target == 0 || n <= target {
        1
    } else {
        n.div_ceil(target)
    }
}

/// Average consecutive chunks of `(time, flux)` so that at most
/// `config.target_points` points remain. Shorter inputs are copied as-is.
///
/// # Errors
/// [`LightCurveError::DimensionMismatch`] if the slices differ in length.
pub fn bin_for_display(time: &[f64], flux: &[f64], config: &BinningConfig) -> Result<BinnedCurve> {
    if time.len() != flux.len() {
        return Err(LightCurveError::DimensionMismatch {
            expected: time.len(),
            got: flux.len(),
        });
    }
    let size = chunk_size(time.len(), config.target_points);
    if size == 1 {
        return Ok(BinnedCurve {
            time: time.to_vec(),
            flux: flux.to_vec(),
        });
    }
    Ok(BinnedCurve {
        time: time.chunks(size).map(mean).collect(),
        flux: flux.chunks(size).map(mean).collect(),
    })
}
