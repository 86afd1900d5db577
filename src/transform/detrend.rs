//! Trend removal for uniformly resampled light curves.
//!
//! The slow stellar/instrumental background is estimated with a running
//! median and subtracted. When the median filter cannot run for the
//! requested kernel, a quadratic Savitzky–Golay smoother is tried once
//! instead; the chosen filter is recorded on the result.

use log::{debug, warn};

use crate::config::DetrendConfig;
use crate::core::{DetrendedSeries, TrendFilter, UniformGrid};
use crate::error::{LightCurveError, Result};
use crate::transform::window::padded_rolling_median;

/// A trend estimate tagged with the filter that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub values: Vec<f64>,
    pub filter: TrendFilter,
}

/// Force `k` to be odd and at least 3.
pub fn safe_kernel(k: usize) -> usize {
    let k = k.max(3);
    if k % 2 == 0 {
        k + 1
    } else {
        k
    }
}

/// Kernel actually used for a series of length `n`.
///
/// A kernel that would cover the whole series shrinks to roughly half of it.
pub fn effective_kernel(requested: usize, n: usize) -> usize {
    let kernel = safe_kernel(requested);
    if kernel >= n {
        safe_kernel((n / 2).max(3))
    } else {
        kernel
    }
}

/// Centered running median with an odd kernel.
///
/// The series is zero-padded at both ends, so within `kernel / 2` points of
/// an edge the median leans toward the smaller values. A dip touching the
/// first or last sample is therefore partly absorbed into the trend.
///
/// # Errors
/// [`LightCurveError::FilterFailure`] if the kernel is even, zero, or longer
/// than the series.
pub fn median_filter(series: &[f64], kernel: usize) -> Result<Vec<f64>> {
    if kernel == 0 || kernel % 2 == 0 {
        return Err(LightCurveError::FilterFailure(format!(
            "median kernel must be odd and positive, got {kernel}"
        )));
    }
    if kernel > series.len() {
        return Err(LightCurveError::FilterFailure(format!(
            "median kernel {kernel} exceeds series length {}",
            series.len()
        )));
    }
    Ok(padded_rolling_median(series, kernel, 0.0))
}

/// Smoothing coefficients of a quadratic Savitzky–Golay filter.
///
/// For a window of `2m + 1` points the weight at offset `j` is
/// `(3(3m² + 3m − 1) − 15j²) / ((2m − 1)(2m + 1)(2m + 3))`.
pub fn savgol_coefficients(window: usize) -> Vec<f64> {
    let m = (window / 2) as f64;
    let norm = (2.0 * m - 1.0) * (2.0 * m + 1.0) * (2.0 * m + 3.0);
    let base = 3.0 * (3.0 * m * m + 3.0 * m - 1.0);
    let half = (window / 2) as i64;
    (-half..=half)
        .map(|j| (base - 15.0 * (j * j) as f64) / norm)
        .collect()
}

/// Quadratic Savitzky–Golay smoothing, edges extended with the nearest value.
///
/// # Errors
/// [`LightCurveError::FilterFailure`] if the window is even, shorter than 3,
/// or longer than the series.
pub fn savgol_filter(series: &[f64], window: usize) -> Result<Vec<f64>> {
    if window < 3 || window % 2 == 0 {
        return Err(LightCurveError::FilterFailure(format!(
            "savitzky-golay window must be odd and at least 3, got {window}"
        )));
    }
    if window > series.len() {
        return Err(LightCurveError::FilterFailure(format!(
            "savitzky-golay window {window} exceeds series length {}",
            series.len()
        )));
    }

    let half = window / 2;
    let coeffs = savgol_coefficients(window);
    let n = series.len();
    let first = series[0];
    let last = series[n - 1];
    let padded: Vec<f64> = std::iter::repeat(first)
        .take(half)
        .chain(series.iter().copied())
        .chain(std::iter::repeat(last).take(half))
        .collect();

    Ok(padded
        .windows(window)
        .map(|w| w.iter().zip(&coeffs).map(|(x, c)| x * c).sum())
        .collect())
}

/// Window the fallback smoother uses for a kernel that failed on `n` points.
fn fallback_window(kernel: usize, n: usize) -> usize {
    let window = if kernel % 2 == 0 { kernel + 1 } else { kernel };
    if window >= n {
        // largest odd length that fits
        (n - (1 - n % 2)).max(3)
    } else {
        window
    }
}

/// Estimate the trend with the median filter, falling back once to
/// Savitzky–Golay smoothing.
///
/// # Errors
/// [`LightCurveError::FilterFailure`] only when both filters fail.
pub fn estimate_trend(series: &[f64], kernel: usize) -> Result<Trend> {
    let primary = match median_filter(series, kernel) {
        Ok(values) => {
            return Ok(Trend {
                values,
                filter: TrendFilter::Median,
            })
        }
        Err(err) => err,
    };

    if series.is_empty() {
        return Err(LightCurveError::FilterFailure(format!(
            "{primary}; no samples for fallback"
        )));
    }
    let window = fallback_window(kernel, series.len());
    warn!("{primary}; retrying with savitzky-golay window {window}");
    match savgol_filter(series, window) {
        Ok(values) => Ok(Trend {
            values,
            filter: TrendFilter::SavitzkyGolay,
        }),
        Err(fallback) => Err(LightCurveError::FilterFailure(format!(
            "median filter failed ({primary}); fallback failed ({fallback})"
        ))),
    }
}

/// Subtract the slow trend from a uniform grid.
///
/// The kernel is `config.kernel_hours` converted to grid steps, made odd
/// and at least 3, and shrunk for short series.
pub fn detrend(grid: &UniformGrid, config: &DetrendConfig) -> Result<DetrendedSeries> {
    let kernel = effective_kernel(config.kernel_steps(grid.step()), grid.len());
    let trend = estimate_trend(grid.flux(), kernel)?;
    debug!(
        "detrended {} points with {:?} kernel {}",
        grid.len(),
        trend.filter,
        kernel
    );
    Ok(DetrendedSeries::new(grid, trend.values, trend.filter))
}
