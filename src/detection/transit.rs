//! Transit candidate detection.
//!
//! Transits are dips, so the detrended residual is inverted and searched for
//! peaks. Peaks are scored by prominence over a robust noise scale, filtered
//! by width and signal-to-noise ratio, and clustered so that a single noisy
//! dip split into several jagged sub-peaks is reported once.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::TransitConfig;
use crate::core::DetrendedSeries;
use crate::detection::peaks::{find_peaks, Peak, PeakOptions};
use crate::utils::stats::{median, robust_sigma};

/// Series shorter than this return no candidates when nothing passes the
/// width/SNR filter.
const MIN_FALLBACK_POINTS: usize = 10;

/// A candidate transit event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitCandidate {
    /// Center time in days.
    pub center_time: f64,
    /// Start of the dip (half-depth crossing) in days.
    pub start_time: f64,
    /// End of the dip (half-depth crossing) in days.
    pub end_time: f64,
    /// Dip depth in flux units (peak prominence of the inverted residual).
    pub depth: f64,
    /// Signal-to-noise ratio, depth over the robust noise scale.
    pub score: f64,
}

impl TransitCandidate {
    /// Duration between the half-depth crossings.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// One or more merged peaks, in fractional grid index units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cluster {
    center: f64,
    left: f64,
    right: f64,
    depth: f64,
    snr: f64,
}

impl Cluster {
    fn from_peak(peak: &Peak, noise: f64) -> Self {
        Self {
            center: peak.index as f64,
            left: peak.left_ip,
            right: peak.right_ip,
            depth: peak.prominence,
            snr: peak.prominence / noise,
        }
    }

    fn merge(self, other: Cluster) -> Self {
        Self {
            center: 0.5 * (self.center + other.center),
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            depth: self.depth.max(other.depth),
            snr: self.snr.max(other.snr),
        }
    }
}

/// Robust noise scale of a residual: normal-scaled MAD, then the standard
/// deviation, then 1.0.
pub fn noise_scale(residual: &[f64]) -> f64 {
    robust_sigma(residual)
}

/// Merge time-sorted clusters whose centers lie within `merge_distance`
/// (grid points) of the running cluster's current center.
fn merge_adjacent(sorted: &[Cluster], merge_distance: f64) -> Vec<Cluster> {
    sorted.iter().fold(Vec::new(), |mut merged: Vec<Cluster>, &next| {
        match merged.last_mut() {
            Some(current) if (next.center - current.center).abs() <= merge_distance => {
                *current = current.merge(next);
            }
            _ => merged.push(next),
        }
        merged
    })
}

/// Detect transit candidates in a detrended series.
///
/// Returns at most `config.max_candidates` candidates ranked by depth.
/// An empty vector means nothing dip-like was found.
pub fn detect_transits(series: &DetrendedSeries, config: &TransitConfig) -> Vec<TransitCandidate> {
    let residual = series.residual();
    let n = residual.len();
    if n < 3 || config.max_candidates == 0 {
        return Vec::new();
    }

    let inverted: Vec<f64> = residual.iter().map(|r| -r).collect();
    let noise = noise_scale(residual);
    let options = PeakOptions {
        min_prominence: config.prominence_floor(noise),
        min_distance: config.min_distance.max(1),
        rel_height: config.rel_height,
    };
    let peaks = find_peaks(&inverted, &options);
    debug!(
        "noise scale {:.6}, prominence floor {:.6}: {} peaks",
        noise,
        options.min_prominence,
        peaks.len()
    );
    if peaks.is_empty() {
        return Vec::new();
    }

    let passing: Vec<&Peak> = peaks
        .iter()
        .filter(|p| p.width() >= config.min_width && p.prominence / noise >= config.min_snr)
        .collect();
    let selected: Vec<&Peak> = if !passing.is_empty() {
        passing
    } else if n < MIN_FALLBACK_POINTS {
        return Vec::new();
    } else {
        warn!(
            "no peak passed width >= {} and snr >= {}; using all {} peaks",
            config.min_width,
            config.min_snr,
            peaks.len()
        );
        peaks.iter().collect()
    };

    let widths: Vec<f64> = selected.iter().map(|p| p.width()).collect();
    let merge_distance = median(&widths);

    // find_peaks returns peaks in index order, which is time order
    let clusters: Vec<Cluster> = selected
        .iter()
        .map(|p| Cluster::from_peak(p, noise))
        .collect();
    let mut merged = merge_adjacent(&clusters, merge_distance);
    debug!(
        "{} peaks merged into {} clusters (merge distance {:.2} points)",
        clusters.len(),
        merged.len(),
        merge_distance
    );

    merged.sort_by(|a, b| {
        b.depth
            .partial_cmp(&a.depth)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    merged.truncate(config.max_candidates);

    merged
        .into_iter()
        .map(|c| TransitCandidate {
            center_time: series.time_at(c.center),
            start_time: series.time_at(c.left),
            end_time: series.time_at(c.right),
            depth: c.depth,
            score: c.snr,
        })
        .collect()
}
