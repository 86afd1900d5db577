//! Uniformly sampled series produced by resampling and detrending.

use serde::{Deserialize, Serialize};

use crate::error::{LightCurveError, Result};

/// Minimum number of points on a uniform grid.
pub const MIN_GRID_POINTS: usize = 3;

/// Flux on an evenly spaced time grid.
///
/// `time[k] = start + k * step`. `filled[k]` records whether bin `k` received
/// at least one raw sample; unfilled bins were interpolated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniformGrid {
    step: f64,
    time: Vec<f64>,
    flux: Vec<f64>,
    filled: Vec<bool>,
}

impl UniformGrid {
    /// Build a fully populated grid from evenly spaced flux values.
    pub fn from_flux(start: f64, step: f64, flux: Vec<f64>) -> Result<Self> {
        let filled = vec![true; flux.len()];
        Self::from_parts(start, step, flux, filled)
    }

    pub(crate) fn from_parts(
        start: f64,
        step: f64,
        flux: Vec<f64>,
        filled: Vec<bool>,
    ) -> Result<Self> {
        if !(start.is_finite() && step.is_finite() && step > 0.0) {
            return Err(LightCurveError::DegenerateSeries(format!(
                "grid needs a finite start and positive step, got start={start}, step={step}"
            )));
        }
        if flux.len() < MIN_GRID_POINTS {
            return Err(LightCurveError::DegenerateSeries(format!(
                "grid has {} points, need at least {MIN_GRID_POINTS}",
                flux.len()
            )));
        }
        if flux.iter().any(|f| !f.is_finite()) {
            return Err(LightCurveError::DegenerateSeries(
                "grid flux contains non-finite values".to_string(),
            ));
        }
        debug_assert_eq!(flux.len(), filled.len());
        let time = (0..flux.len()).map(|k| start + k as f64 * step).collect();
        Ok(Self {
            step,
            time,
            flux,
            filled,
        })
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false: a grid has at least [`MIN_GRID_POINTS`] points.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Grid step in days.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Grid times in days.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Flux per grid point (summed per bin, interpolated where empty).
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Whether each bin received raw samples.
    pub fn filled(&self) -> &[bool] {
        &self.filled
    }

    /// Number of bins that received raw samples.
    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|&&f| f).count()
    }
}

/// Which filter produced a trend estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendFilter {
    /// Running median (primary).
    Median,
    /// Quadratic Savitzky–Golay smoothing (fallback).
    SavitzkyGolay,
}

/// A uniform grid with its slow trend removed.
///
/// `residual = flux - trend` is the signal every detector works on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetrendedSeries {
    step: f64,
    time: Vec<f64>,
    flux: Vec<f64>,
    trend: Vec<f64>,
    residual: Vec<f64>,
    filter: TrendFilter,
}

impl DetrendedSeries {
    pub(crate) fn new(grid: &UniformGrid, trend: Vec<f64>, filter: TrendFilter) -> Self {
        let residual = grid
            .flux()
            .iter()
            .zip(&trend)
            .map(|(f, t)| f - t)
            .collect();
        Self {
            step: grid.step(),
            time: grid.time().to_vec(),
            flux: grid.flux().to_vec(),
            trend,
            residual,
            filter,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Grid step in days.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Grid times in days.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Grid flux before trend removal.
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Estimated slow trend.
    pub fn trend(&self) -> &[f64] {
        &self.trend
    }

    /// Flux minus trend.
    pub fn residual(&self) -> &[f64] {
        &self.residual
    }

    /// Filter that produced the trend.
    pub fn filter(&self) -> TrendFilter {
        self.filter
    }

    /// Time of a (possibly fractional) grid index.
    pub fn time_at(&self, index: f64) -> f64 {
        self.time.first().copied().unwrap_or(0.0) + index * self.step
    }
}
