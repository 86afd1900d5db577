//! End-to-end light curve analysis.
//!
//! [`Pipeline`] chains the stages in order:
//!
//! 1. merge and clean the sources ([`LightCurve::from_sources`])
//! 2. reject spikes ([`reject_spikes`])
//! 3. resample onto a uniform grid ([`resample`])
//! 4. remove the slow trend ([`detrend`])
//! 5. detect observing segments, transit candidates and anomaly regions
//! 6. fold the residual on the estimated period ([`fold`])
//!
//! Errors from stages 1 to 4 abort the run. Detectors that find nothing
//! return empty lists and the run still succeeds.
//!
//! # Example
//!
//! ```
//! use transitscan::pipeline::Pipeline;
//!
//! let time: Vec<f64> = (0..101).map(|i| i as f64 / 24.0).collect();
//! let mut flux = vec![1.0; 101];
//! for f in flux.iter_mut().skip(48).take(5) {
//!     *f = 0.9;
//! }
//!
//! let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();
//! assert_eq!(analysis.transits.len(), 1);
//! assert!(analysis.transits[0].score >= 3.0);
//! ```

use log::info;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::core::{DetrendedSeries, LightCurve};
use crate::detection::{
    detect_anomalies, detect_segments, detect_transits, estimate_period, reject_spikes,
    AnomalyRegion, Segment, TransitCandidate,
};
use crate::error::{LightCurveError, Result};
use crate::transform::{bin_for_display, detrend, fold, resample, BinnedCurve, FoldedCurve};

/// Everything the pipeline produces for one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Merged and cleaned input, before spike rejection.
    pub raw: LightCurve,
    /// Number of samples dropped by spike rejection.
    pub spikes_removed: usize,
    /// Uniform grid with trend and residual.
    pub detrended: DetrendedSeries,
    /// Observing segments of the raw curve.
    pub segments: Vec<Segment>,
    /// Transit candidates ranked by depth.
    pub transits: Vec<TransitCandidate>,
    /// Anomaly regions ranked by depth.
    pub anomalies: Vec<AnomalyRegion>,
    /// Period guess from the two strongest anomaly regions.
    pub period_estimate: Option<f64>,
    /// Residual folded on the estimated (or default) period.
    pub folded: FoldedCurve,
    /// Residual downsampled for plotting.
    pub display: BinnedCurve,
}

/// Configured light curve analysis pipeline.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline after validating the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze one target given one or more `(time, flux)` sources.
    ///
    /// # Errors
    /// Propagates ingestion, resampling and detrending errors. Returns
    /// [`LightCurveError::InsufficientData`] when the detrended series is
    /// shorter than `ingest.min_points`.
    pub fn run(&self, sources: &[(&[f64], &[f64])]) -> Result<Analysis> {
        let config = &self.config;

        let raw = LightCurve::from_sources(sources, config.ingest.min_points)?;
        info!(
            "ingested {} samples from {} sources",
            raw.len(),
            sources.len()
        );

        let spikes = reject_spikes(&raw, &config.spike);
        let grid = resample(&spikes.curve, &config.resample)?;
        info!(
            "resampled onto {} bins after removing {} spikes",
            grid.len(),
            spikes.removed
        );

        let detrended = detrend(&grid, &config.detrend)?;
        if detrended.len() < config.ingest.min_points {
            return Err(LightCurveError::InsufficientData {
                needed: config.ingest.min_points,
                got: detrended.len(),
            });
        }

        let segments = detect_segments(raw.time(), &config.segment);
        let transits = detect_transits(&detrended, &config.transit);
        let anomalies = detect_anomalies(&detrended, &config.anomaly);
        let period_estimate = estimate_period(&anomalies);
        info!(
            "found {} segments, {} transit candidates, {} anomaly regions",
            segments.len(),
            transits.len(),
            anomalies.len()
        );

        let folded = fold(
            detrended.time(),
            detrended.residual(),
            period_estimate,
            &config.fold,
        )?;
        let display = bin_for_display(detrended.time(), detrended.residual(), &config.binning)?;
        info!("folded on period {:.6} days", folded.period);

        Ok(Analysis {
            raw,
            spikes_removed: spikes.removed,
            detrended,
            segments,
            transits,
            anomalies,
            period_estimate,
            folded,
            display,
        })
    }
}

/// Run the pipeline once with the given configuration.
pub fn analyze(sources: &[(&[f64], &[f64])], config: &PipelineConfig) -> Result<Analysis> {
    Pipeline::new(config.clone())?.run(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;

    fn hourly(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64 / 24.0).collect()
    }

    #[test]
    fn pipeline_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
        assert_send_sync::<Analysis>();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = PipelineConfig::default();
        config.binning.target_points = 0;
        assert!(matches!(
            Pipeline::new(config),
            Err(LightCurveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn constant_flux_yields_empty_detections() {
        let time = hourly(200);
        let flux = vec![10.0; 200];
        let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();

        assert!(analysis.transits.is_empty());
        assert!(analysis.anomalies.is_empty());
        assert_eq!(analysis.period_estimate, None);
        assert_eq!(analysis.segments.len(), 1);
        assert_eq!(analysis.folded.len(), 200);
        assert_eq!(analysis.display.len(), 200);
        assert!(analysis.detrended.residual().iter().all(|&r| r == 0.0));
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let time = hourly(20);
        let flux = vec![1.0; 20];
        let err = Pipeline::default().run(&[(&time, &flux)]).unwrap_err();
        assert_eq!(err, LightCurveError::InsufficientData { needed: 50, got: 20 });
    }

    #[test]
    fn short_grid_after_detrend_is_an_error() {
        // 60 samples packed into 10 hours give only 10 grid points
        let time: Vec<f64> = (0..60).map(|i| i as f64 / 144.0).collect();
        let flux = vec![1.0; 60];
        let err = Pipeline::default().run(&[(&time, &flux)]).unwrap_err();
        assert!(matches!(err, LightCurveError::InsufficientData { needed: 50, .. }));
    }

    #[test]
    fn analyze_uses_given_config() {
        let time = hourly(30);
        let flux = vec![1.0; 30];
        let config = PipelineConfig {
            ingest: IngestConfig::default().min_points(10),
            ..Default::default()
        };
        let analysis = analyze(&[(&time, &flux)], &config).unwrap();
        assert_eq!(analysis.raw.len(), 30);
        assert_eq!(analysis.detrended.len(), 30);
    }
}
