//! Statistical utility functions.
//!
//! Variances here are population variances (divisor `n`), which is what the
//! photometric thresholds in this crate are calibrated against.

/// Factor turning a median absolute deviation into a Gaussian sigma,
/// `1 / Φ⁻¹(3/4)`.
pub const MAD_TO_SIGMA: f64 = 1.482_602_218_505_602;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the population variance of a slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Calculate the population standard deviation of a slice.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    median_of_sorted(&sorted)
}

/// Median of an already sorted, non-empty slice.
pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Median absolute deviation around `center`.
pub fn mad_about(values: &[f64], center: f64) -> f64 {
    let deviations: Vec<f64> = values.iter().map(|x| (x - center).abs()).collect();
    median(&deviations)
}

/// Median absolute deviation around the median.
pub fn mad(values: &[f64]) -> f64 {
    mad_about(values, median(values))
}

/// Spread estimate that is never zero.
///
/// Tries `primary`, then the population standard deviation, then `1.0`.
/// Non-finite candidates are skipped the same way zero ones are.
pub fn nonzero_spread(values: &[f64], primary: f64) -> f64 {
    if primary.is_finite() && primary > 0.0 {
        return primary;
    }
    let sd = std_dev(values);
    if sd.is_finite() && sd > 0.0 {
        return sd;
    }
    1.0
}

/// Robust noise scale: normal-scaled MAD with the [`nonzero_spread`] chain.
pub fn robust_sigma(values: &[f64]) -> f64 {
    nonzero_spread(values, MAD_TO_SIGMA * mad(values))
}
