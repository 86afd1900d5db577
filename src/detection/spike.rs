//! Pre-resample spike rejection.
//!
//! Removes isolated flux spikes using median/MAD statistics before the
//! samples are binned, so a single cosmic-ray hit cannot dominate a bin sum.

use log::{debug, warn};

use crate::config::SpikeConfig;
use crate::core::LightCurve;
use crate::utils::stats::{mad_about, median, nonzero_spread};

/// Result of spike rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeRejection {
    /// Surviving samples. Never empty when the input was not empty.
    pub curve: LightCurve,
    /// Number of samples removed.
    pub removed: usize,
    /// Median flux used as the center.
    pub center: f64,
    /// Spread used for the cut (MAD, else std, else 1.0).
    pub scale: f64,
    /// True when every sample would have been rejected and the input was kept.
    pub fell_back: bool,
}

impl SpikeRejection {
    fn unchanged(curve: &LightCurve, center: f64, scale: f64, fell_back: bool) -> Self {
        Self {
            curve: curve.clone(),
            removed: 0,
            center,
            scale,
            fell_back,
        }
    }
}

/// Absolute deviations from the median in units of the robust scale.
///
/// Returns `(scores, center, scale)`. The scale never is zero.
pub fn spike_scores(flux: &[f64]) -> (Vec<f64>, f64, f64) {
    if flux.is_empty() {
        return (Vec::new(), 0.0, 1.0);
    }
    let center = median(flux);
    let scale = nonzero_spread(flux, mad_about(flux, center));
    let scores = flux.iter().map(|f| (f - center).abs() / scale).collect();
    (scores, center, scale)
}

/// Drop samples further than `mad_multiplier × MAD` from the median flux.
///
/// Short series (at most `config.min_points` samples) are returned as is.
/// If the cut would remove every sample the unfiltered series is returned
/// with `fell_back` set.
pub fn reject_spikes(curve: &LightCurve, config: &SpikeConfig) -> SpikeRejection {
    let (scores, center, scale) = spike_scores(curve.flux());
    if curve.len() <= config.min_points {
        return SpikeRejection::unchanged(curve, center, scale, false);
    }

    let keep: Vec<bool> = scores
        .iter()
        .map(|&score| score < config.mad_multiplier)
        .collect();
    let kept = keep.iter().filter(|&&k| k).count();

    if kept == 0 {
        warn!(
            "spike cut at {}x scale would remove all {} samples; keeping unfiltered series",
            config.mad_multiplier,
            curve.len()
        );
        return SpikeRejection::unchanged(curve, center, scale, true);
    }
    if kept == curve.len() {
        return SpikeRejection::unchanged(curve, center, scale, false);
    }

    let removed = curve.len() - kept;
    debug!(
        "removed {} spikes (median={:.6}, scale={:.6})",
        removed, center, scale
    );
    SpikeRejection {
        curve: curve.select(&keep),
        removed,
        center,
        scale,
        fell_back: false,
    }
}
