//! Phase folding.
//!
//! Folding maps each time stamp to its position within a trial period so
//! repeated transits stack on top of each other.

use serde::Serialize;

use crate::config::FoldConfig;
use crate::error::{LightCurveError, Result};

/// A light curve folded on a period, sorted by phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldedCurve {
    /// Phase in `[0, 1)`, ascending.
    pub phase: Vec<f64>,
    /// Flux reordered to match `phase`.
    pub flux: Vec<f64>,
    /// Period used for folding, in days.
    pub period: f64,
}

impl FoldedCurve {
    /// Number of folded samples.
    pub fn len(&self) -> usize {
        self.phase.len()
    }

    /// Check if the folded curve is empty.
    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }
}

/// Period to fold on.
///
/// Uses `estimate` when it is finite and positive, otherwise the time span
/// divided by `config.default_divisions`, otherwise one day.
pub fn choose_period(estimate: Option<f64>, time: &[f64], config: &FoldConfig) -> f64 {
    if let Some(p) = estimate.filter(|p| p.is_finite() && *p > 0.0) {
        return p;
    }
    let span = match (time.first(), time.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    };
    let fallback = span / config.default_divisions;
    if fallback.is_finite() && fallback > 0.0 {
        fallback
    } else {
        1.0
    }
}

/// Phase of `t` within `period`, relative to `epoch`, in `[0, 1)`.
pub fn phase_of(t: f64, epoch: f64, period: f64) -> f64 {
    let phase = ((t - epoch) / period).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if phase >= 1.0 {
        0.0
    } else {
        phase
    }
}

/// Fold `(time, flux)` on the chosen period, with the first time stamp as
/// epoch. Samples are sorted by phase; ties keep their time order.
///
/// # Errors
/// [`LightCurveError::DimensionMismatch`] if the slices differ in length.
pub fn fold(
    time: &[f64],
    flux: &[f64],
    estimate: Option<f64>,
    config: &FoldConfig,
) -> Result<FoldedCurve> {
    if time.len() != flux.len() {
        return Err(LightCurveError::DimensionMismatch {
            expected: time.len(),
            got: flux.len(),
        });
    }
    let period = choose_period(estimate, time, config);
    let epoch = time.first().copied().unwrap_or(0.0);

    let mut pairs: Vec<(f64, f64)> = time
        .iter()
        .zip(flux)
        .map(|(&t, &f)| (phase_of(t, epoch, period), f))
        .collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let (phase, flux) = pairs.into_iter().unzip();
    Ok(FoldedCurve {
        phase,
        flux,
        period,
    })
}
