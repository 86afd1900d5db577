//! Configuration for the light curve pipeline.
//!
//! Every stage takes its own config by reference, so stages stay pure and can
//! be called on their own. [`PipelineConfig`] bundles them for
//! [`crate::pipeline::Pipeline`] and can be loaded from JSON, where missing
//! fields keep their defaults.
//!
//! # Example
//!
//! ```
//! use transitscan::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_json(r#"{ "transit": { "min_snr": 5.0 } }"#).unwrap();
//! assert_eq!(config.transit.min_snr, 5.0);
//! assert_eq!(config.ingest.min_points, 50);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LightCurveError, Result};

/// One hour expressed in days.
pub const HOUR_IN_DAYS: f64 = 1.0 / 24.0;

/// Configuration for merging and cleaning raw sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Minimum number of finite samples required after cleaning, and of
    /// residual samples after detrending.
    pub min_points: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { min_points: 50 }
    }
}

impl IngestConfig {
    /// Set the minimum point count.
    pub fn min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }
}

/// Configuration for pre-resample spike rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeConfig {
    /// Samples further than `mad_multiplier × MAD` from the median are dropped.
    pub mad_multiplier: f64,
    /// Series with this many samples or fewer are left untouched.
    pub min_points: usize,
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            mad_multiplier: 10.0,
            min_points: 5,
        }
    }
}

impl SpikeConfig {
    /// Set the MAD multiplier.
    pub fn mad_multiplier(mut self, multiplier: f64) -> Self {
        self.mad_multiplier = multiplier;
        self
    }
}

/// Configuration for uniform resampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Grid step in days.
    pub step_days: f64,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            step_days: HOUR_IN_DAYS,
        }
    }
}

impl ResampleConfig {
    /// Set the grid step in days.
    pub fn step_days(mut self, step_days: f64) -> Self {
        self.step_days = step_days;
        self
    }
}

/// Configuration for trend removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetrendConfig {
    /// Median filter width in hours.
    pub kernel_hours: f64,
}

impl Default for DetrendConfig {
    fn default() -> Self {
        Self { kernel_hours: 25.0 }
    }
}

impl DetrendConfig {
    /// Set the kernel width in hours.
    pub fn kernel_hours(mut self, hours: f64) -> Self {
        self.kernel_hours = hours;
        self
    }

    /// Kernel width in grid steps for a grid of `step_days`.
    pub fn kernel_steps(&self, step_days: f64) -> usize {
        let steps = self.kernel_hours * HOUR_IN_DAYS / step_days;
        if steps.is_finite() && steps > 0.0 {
            steps.round() as usize
        } else {
            0
        }
    }
}

/// Configuration for observation-segment detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Gaps strictly longer than this (days) start a new segment.
    pub gap_threshold_days: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            gap_threshold_days: 5.0,
        }
    }
}

impl SegmentConfig {
    /// Set the gap threshold in days.
    pub fn gap_threshold_days(mut self, days: f64) -> Self {
        self.gap_threshold_days = days;
        self
    }
}

/// Configuration for the transit candidate detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitConfig {
    /// Minimum prominence as a multiple of the noise scale.
    pub prominence_factor: f64,
    /// Absolute minimum prominence; overrides `prominence_factor` when set.
    pub min_prominence: Option<f64>,
    /// Minimum separation between peaks in grid points.
    pub min_distance: usize,
    /// Minimum half-prominence width in grid points.
    pub min_width: f64,
    /// Minimum signal-to-noise ratio.
    pub min_snr: f64,
    /// Maximum number of candidates returned.
    pub max_candidates: usize,
    /// Relative height at which peak widths are measured.
    pub rel_height: f64,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            prominence_factor: 2.0,
            min_prominence: None,
            min_distance: 3,
            min_width: 2.0,
            min_snr: 3.0,
            max_candidates: 10,
            rel_height: 0.5,
        }
    }
}

impl TransitConfig {
    /// Set an absolute minimum prominence.
    pub fn min_prominence(mut self, prominence: f64) -> Self {
        self.min_prominence = Some(prominence);
        self
    }

    /// Set the minimum SNR.
    pub fn min_snr(mut self, snr: f64) -> Self {
        self.min_snr = snr;
        self
    }

    /// Set the minimum width in grid points.
    pub fn min_width(mut self, width: f64) -> Self {
        self.min_width = width;
        self
    }

    /// Set the maximum number of candidates.
    pub fn max_candidates(mut self, count: usize) -> Self {
        self.max_candidates = count;
        self
    }

    /// Prominence floor for a given noise scale.
    pub fn prominence_floor(&self, noise_scale: f64) -> f64 {
        self.min_prominence
            .unwrap_or(self.prominence_factor * noise_scale)
    }
}

/// Configuration for the anomaly region heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Local median window; `None` uses `max(5, n / 100)`.
    pub window: Option<usize>,
    /// Threshold as a multiple of the global standard deviation.
    pub threshold_multiplier: f64,
    /// Maximum number of regions returned.
    pub max_regions: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window: None,
            threshold_multiplier: 1.5,
            max_regions: 5,
        }
    }
}

impl AnomalyConfig {
    /// Use a fixed local window.
    pub fn window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    /// Set the threshold multiplier.
    pub fn threshold_multiplier(mut self, multiplier: f64) -> Self {
        self.threshold_multiplier = multiplier;
        self
    }

    /// Set the maximum number of regions.
    pub fn max_regions(mut self, count: usize) -> Self {
        self.max_regions = count;
        self
    }

    /// Window actually used for a series of length `n`.
    pub fn effective_window(&self, n: usize) -> usize {
        self.window.unwrap_or_else(|| (n / 100).max(5)).max(1)
    }
}

/// Configuration for phase folding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldConfig {
    /// Without a period estimate, the span is divided by this.
    pub default_divisions: f64,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            default_divisions: 10.0,
        }
    }
}

/// Configuration for display downsampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningConfig {
    /// Approximate number of points kept for display.
    pub target_points: usize,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self { target_points: 600 }
    }
}

/// Configuration for the full pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ingest: IngestConfig,
    pub spike: SpikeConfig,
    pub resample: ResampleConfig,
    pub detrend: DetrendConfig,
    pub segment: SegmentConfig,
    pub transit: TransitConfig,
    pub anomaly: AnomalyConfig,
    pub fold: FoldConfig,
    pub binning: BinningConfig,
}

impl PipelineConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        positive("resample.step_days", self.resample.step_days)?;
        positive("detrend.kernel_hours", self.detrend.kernel_hours)?;
        positive("spike.mad_multiplier", self.spike.mad_multiplier)?;
        non_negative("segment.gap_threshold_days", self.segment.gap_threshold_days)?;
        positive("transit.prominence_factor", self.transit.prominence_factor)?;
        if let Some(p) = self.transit.min_prominence {
            non_negative("transit.min_prominence", p)?;
        }
        non_negative("transit.min_width", self.transit.min_width)?;
        non_negative("transit.min_snr", self.transit.min_snr)?;
        if !(self.transit.rel_height > 0.0 && self.transit.rel_height <= 1.0) {
            return Err(LightCurveError::InvalidParameter(format!(
                "transit.rel_height must be in (0, 1], got {}",
                self.transit.rel_height
            )));
        }
        positive("anomaly.threshold_multiplier", self.anomaly.threshold_multiplier)?;
        positive("fold.default_divisions", self.fold.default_divisions)?;
        nonzero("ingest.min_points", self.ingest.min_points)?;
        nonzero("transit.min_distance", self.transit.min_distance)?;
        nonzero("transit.max_candidates", self.transit.max_candidates)?;
        nonzero("anomaly.max_regions", self.anomaly.max_regions)?;
        nonzero("binning.target_points", self.binning.target_points)?;
        if self.anomaly.window == Some(0) {
            return Err(LightCurveError::InvalidParameter(
                "anomaly.window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LightCurveError::InvalidParameter(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LightCurveError::InvalidParameter(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}

fn nonzero(name: &str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(LightCurveError::InvalidParameter(format!(
            "{name} must be at least 1"
        )))
    }
}
