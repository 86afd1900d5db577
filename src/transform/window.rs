//! Centered rolling window functions.
//!
//! [`rolling_median`] truncates windows at the series edges, so every output
//! is computed from real samples only. [`padded_rolling_median`] instead
//! pads both ends with a constant so every window has the full width.

use crate::utils::stats::median_of_sorted;

/// Bounds `[start, end)` of the centered window of size `window` around `i`.
pub fn centered_bounds(i: usize, window: usize, n: usize) -> (usize, usize) {
    let half = window / 2;
    let start = i.saturating_sub(half);
    let end = (i + window - half).min(n);
    (start, end)
}

/// Centered rolling median.
///
/// Returns NaN everywhere for a zero-width window.
pub fn rolling_median(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    if window == 0 {
        return vec![f64::NAN; n];
    }
    let mut scratch = Vec::with_capacity(window);
    (0..n)
        .map(|i| {
            let (start, end) = centered_bounds(i, window, n);
            scratch.clear();
            scratch.extend_from_slice(&series[start..end]);
            scratch.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            median_of_sorted(&scratch)
        })
        .collect()
}

/// Centered rolling median over `series` padded with `fill` on both sides.
///
/// Every window holds exactly `window` values, so near the edges the padding
/// takes part in the median. Returns NaN everywhere for a zero-width window.
pub fn padded_rolling_median(series: &[f64], window: usize, fill: f64) -> Vec<f64> {
    if window == 0 {
        return vec![f64::NAN; series.len()];
    }
    let half = window / 2;
    let padded: Vec<f64> = std::iter::repeat(fill)
        .take(half)
        .chain(series.iter().copied())
        .chain(std::iter::repeat(fill).take(window - 1 - half))
        .collect();
    let mut scratch = Vec::with_capacity(window);
    padded
        .windows(window)
        .map(|w| {
            scratch.clear();
            scratch.extend_from_slice(w);
            scratch.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            median_of_sorted(&scratch)
        })
        .collect()
}
