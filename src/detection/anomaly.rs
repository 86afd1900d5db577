//! Anomaly region heuristic.
//!
//! A coarse cross-check for the transit detector. Each point is scored by
//! how far its local median sits below the global median, and runs of high
//! scores become regions. The two strongest regions seed a period guess for
//! phase folding. Results are kept separate from transit candidates.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnomalyConfig;
use crate::core::DetrendedSeries;
use crate::transform::window::rolling_median;
use crate::utils::stats::{mean, median, std_dev};

/// A region where the local flux level drops below the global level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRegion {
    /// Start time of the padded region in days.
    pub start: f64,
    /// End time of the padded region in days.
    pub end: f64,
    /// Center time of the detected run in days.
    pub center: f64,
    /// Mean score over the run, in flux units.
    pub depth: f64,
    /// `end - start` in days.
    pub duration: f64,
}

/// Global median minus centered local median at every point.
///
/// Positive where the neighbourhood is dimmer than the series as a whole.
pub fn anomaly_scores(flux: &[f64], window: usize) -> Vec<f64> {
    if flux.is_empty() {
        return Vec::new();
    }
    let global = median(flux);
    rolling_median(flux, window.max(1))
        .into_iter()
        .map(|local| global - local)
        .collect()
}

/// Runs `[start, end]` (inclusive) that rise above `threshold` and continue
/// while the score stays above half of it.
fn score_runs(scores: &[f64], threshold: f64) -> Vec<(usize, usize)> {
    let n = scores.len();
    let mut runs = Vec::new();
    let mut i = 0;
    while i < n {
        if scores[i] > threshold {
            let start = i;
            let mut end = i;
            while end + 1 < n && scores[end + 1] > threshold / 2.0 {
                end += 1;
            }
            runs.push((start, end));
            i = end + 1;
        } else {
            i += 1;
        }
    }
    runs
}

/// Detect dimming regions in the detrended residual.
///
/// Regions are ranked by depth and truncated to `config.max_regions`.
pub fn detect_anomalies(series: &DetrendedSeries, config: &AnomalyConfig) -> Vec<AnomalyRegion> {
    let flux = series.residual();
    let time = series.time();
    let n = flux.len();
    if n == 0 || config.max_regions == 0 {
        return Vec::new();
    }

    let sd = std_dev(flux);
    if !(sd.is_finite() && sd > 0.0) {
        return Vec::new();
    }
    let threshold = config.threshold_multiplier * sd;
    let window = config.effective_window(n);
    let scores = anomaly_scores(flux, window);

    let mut regions: Vec<AnomalyRegion> = score_runs(&scores, threshold)
        .into_iter()
        .map(|(start, end)| {
            let len = end - start + 1;
            let padded_start = start.saturating_sub(2 * len);
            let padded_end = (end + 2 * len).min(n - 1);
            AnomalyRegion {
                start: time[padded_start],
                end: time[padded_end],
                center: 0.5 * (time[start] + time[end]),
                depth: mean(&scores[start..=end]),
                duration: time[padded_end] - time[padded_start],
            }
        })
        .collect();
    debug!(
        "anomaly scan (window {}, threshold {:.6}) found {} regions",
        window,
        threshold,
        regions.len()
    );

    regions.sort_by(|a, b| {
        b.depth
            .partial_cmp(&a.depth)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    regions.truncate(config.max_regions);
    regions
}

/// Period guess from the center spacing of the two strongest regions.
///
/// `regions` must be ranked strongest first, as returned by
/// [`detect_anomalies`].
pub fn estimate_period(regions: &[AnomalyRegion]) -> Option<f64> {
    match regions {
        [first, second, ..] => {
            let period = (first.center - second.center).abs();
            (period.is_finite() && period > 0.0).then_some(period)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetrendConfig;
    use crate::core::UniformGrid;
    use crate::transform::detrend::detrend;
    use approx::assert_relative_eq;

    const STEP: f64 = 1.0 / 24.0;

    fn detrended(flux: Vec<f64>) -> DetrendedSeries {
        let grid = UniformGrid::from_flux(0.0, STEP, flux).unwrap();
        detrend(&grid, &DetrendConfig::default()).unwrap()
    }

    #[test]
    fn scores_are_positive_in_dips() {
        let mut flux = vec![0.0; 21];
        for f in flux.iter_mut().skip(9).take(3) {
            *f = -1.0;
        }
        let scores = anomaly_scores(&flux, 3);
        assert_relative_eq!(scores[10], 1.0);
        assert_relative_eq!(scores[0], 0.0);
    }

    #[test]
    fn box_dip_gives_padded_region() {
        let mut flux = vec![1.0; 101];
        for f in flux.iter_mut().skip(48).take(5) {
            *f = 0.9;
        }
        let regions = detect_anomalies(&detrended(flux), &AnomalyConfig::default());

        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        // run covers 48..=52, padded by 10 on each side
        assert_relative_eq!(r.start, 38.0 * STEP, epsilon = 1e-9);
        assert_relative_eq!(r.end, 62.0 * STEP, epsilon = 1e-9);
        assert_relative_eq!(r.center, 50.0 * STEP, epsilon = 1e-9);
        assert_relative_eq!(r.depth, 0.1, epsilon = 1e-9);
        assert_relative_eq!(r.duration, 24.0 * STEP, epsilon = 1e-9);
    }

    #[test]
    fn padding_is_clamped_at_edges() {
        // close enough to the start for the padding to clamp, far enough
        // that the zero-padded trend does not swallow the dip
        let mut flux = vec![1.0; 101];
        for f in flux.iter_mut().skip(5).take(4) {
            *f = 0.8;
        }
        let regions = detect_anomalies(&detrended(flux), &AnomalyConfig::default().window(3));
        assert_eq!(regions.len(), 1);
        assert_relative_eq!(regions[0].start, 0.0);
    }

    #[test]
    fn periodic_dips_seed_period() {
        let mut flux = vec![1.0; 400];
        for start in [50, 150, 250, 350] {
            for f in flux.iter_mut().skip(start).take(5) {
                *f = 0.9;
            }
        }
        let series = detrended(flux);
        let regions = detect_anomalies(&series, &AnomalyConfig::default());
        assert_eq!(regions.len(), 4);
        let period = estimate_period(&regions).unwrap();
        // any two distinct dips are a whole number of periods apart
        let cycles = period / (100.0 * STEP);
        assert_relative_eq!(cycles, cycles.round(), epsilon = 1e-9);
        assert!(cycles.round() >= 1.0);
    }

    #[test]
    fn flat_residual_has_no_regions() {
        let regions = detect_anomalies(&detrended(vec![5.0; 100]), &AnomalyConfig::default());
        assert!(regions.is_empty());
        assert_eq!(estimate_period(&regions), None);
    }

    #[test]
    fn truncates_to_max_regions() {
        let mut flux = vec![1.0; 400];
        for start in [50, 150, 250, 350] {
            for f in flux.iter_mut().skip(start).take(5) {
                *f = 0.9;
            }
        }
        let regions =
            detect_anomalies(&detrended(flux), &AnomalyConfig::default().max_regions(2));
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn score_runs_use_hysteresis() {
        let scores = [0.0, 1.2, 0.6, 0.6, 0.4, 1.5, 0.0];
        assert_eq!(score_runs(&scores, 1.0), vec![(1, 3), (5, 5)]);
    }
}
