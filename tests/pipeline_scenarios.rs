//! End-to-end scenarios for the light curve pipeline.
//!
//! These run the full pipeline on synthetic light curves and check what a
//! caller would see: candidate positions and scores, segment layout, and
//! the errors raised for unusable input.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;
use transitscan::config::{PipelineConfig, TransitConfig};
use transitscan::core::TrendFilter;
use transitscan::prelude::*;

const HOUR: f64 = 1.0 / 24.0;

fn hourly(n: usize, start: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * HOUR).collect()
}

/// Slowly brightening star with Gaussian photometric noise.
fn noisy_ramp(n: usize, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).unwrap();
    (0..n)
        .map(|i| 0.9 + 0.2 * i as f64 / n as f64 + rng.sample(&normal))
        .collect()
}

// ============================================================================
// Reference scenario
// ============================================================================

#[test]
fn box_dip_in_flat_curve() {
    let time = hourly(101, 0.0);
    let mut flux = vec![1.0; 101];
    for f in flux.iter_mut().skip(48).take(5) {
        *f = 0.9;
    }

    let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();

    assert_eq!(analysis.raw.len(), 101);
    assert_eq!(analysis.spikes_removed, 0);
    assert_eq!(analysis.detrended.len(), 101);
    assert_eq!(analysis.detrended.filter(), TrendFilter::Median);

    assert_eq!(analysis.transits.len(), 1);
    let candidate = &analysis.transits[0];
    assert_relative_eq!(candidate.center_time, 50.0 * HOUR, epsilon = 1e-9);
    assert_relative_eq!(candidate.depth, 0.1, epsilon = 1e-9);
    assert!(candidate.score >= 3.0);
    assert!(candidate.start_time <= candidate.center_time);
    assert!(candidate.center_time <= candidate.end_time);

    assert_eq!(analysis.anomalies.len(), 1);
    assert_relative_eq!(analysis.anomalies[0].center, 50.0 * HOUR, epsilon = 1e-9);
    assert_eq!(analysis.period_estimate, None);

    // no period estimate: fold on a tenth of the span
    assert_relative_eq!(analysis.folded.period, 100.0 * HOUR / 10.0, epsilon = 1e-12);
    assert_eq!(analysis.segments.len(), 1);
}

#[test]
fn analysis_serializes_to_json() {
    let time = hourly(101, 0.0);
    let mut flux = vec![1.0; 101];
    for f in flux.iter_mut().skip(48).take(5) {
        *f = 0.9;
    }
    let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["transits"].as_array().unwrap().len(), 1);
    assert_eq!(json["detrended"]["filter"], "median");
    assert!(json["period_estimate"].is_null());
}

// ============================================================================
// Synthetic injection
// ============================================================================

#[test]
fn injected_dip_is_recovered_once() {
    let n = 2000;
    let sigma = 1e-3;
    let depth = 20.0 * sigma;
    let time = hourly(n, 0.0);
    let mut flux = noisy_ramp(n, sigma, 42);
    for f in flux.iter_mut().skip(1000).take(4) {
        *f -= depth;
    }
    let dip_center = 1001.5 * HOUR;

    let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();
    assert_eq!(analysis.spikes_removed, 0);

    let covering: Vec<&TransitCandidate> = analysis
        .transits
        .iter()
        .filter(|c| c.start_time <= dip_center && dip_center <= c.end_time)
        .collect();
    assert_eq!(covering.len(), 1);

    let top = &analysis.transits[0];
    assert_eq!(top, covering[0]);
    assert!((top.center_time - dip_center).abs() <= 3.0 * HOUR);

    let expected = depth / sigma;
    assert!(
        top.score > 0.8 * expected && top.score < 1.6 * expected,
        "score {:.2} too far from {:.2}",
        top.score,
        expected
    );
}

#[test]
fn gaussian_noise_is_not_an_error() {
    let n = 2000;
    let time = hourly(n, 0.0);
    let flux = noisy_ramp(n, 1e-3, 7);

    let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();

    assert!(analysis.transits.len() <= TransitConfig::default().max_candidates);
    assert!(analysis
        .transits
        .windows(2)
        .all(|w| w[0].depth >= w[1].depth));
    // noise peaks stay far below a real 20-sigma dip
    assert!(analysis.transits.iter().all(|c| c.score < 10.0));
    assert!(analysis.detrended.residual().iter().all(|r| r.is_finite()));
}

// Only the dither case asserts an empty candidate list. Gaussian noise may
// still yield low-score candidates through the unfiltered-peak fallback; see
// "Noise without a dip" in DESIGN.md.
#[test]
fn sub_bin_dither_without_dip_gives_no_candidates() {
    // two samples per hourly bin, alternating around the mean
    let time: Vec<f64> = (0..400)
        .map(|i| (i / 2) as f64 * HOUR + (i % 2) as f64 * 0.4 * HOUR)
        .collect();
    let flux: Vec<f64> = (0..400)
        .map(|i| if i % 2 == 0 { 1.0 + 0.01 } else { 1.0 - 0.01 })
        .collect();

    let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();

    assert_eq!(analysis.detrended.len(), 200);
    assert!(analysis.transits.is_empty());
    assert!(analysis.anomalies.is_empty());
}

// ============================================================================
// Periodic dips
// ============================================================================

#[test]
fn periodic_dips_fold_on_the_estimated_period() {
    let time = hourly(400, 0.0);
    let mut flux = vec![1.0; 400];
    for start in [50, 150, 250, 350] {
        for f in flux.iter_mut().skip(start).take(5) {
            *f = 0.9;
        }
    }

    let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();
    assert_eq!(analysis.spikes_removed, 0);
    assert_eq!(analysis.transits.len(), 4);
    assert_eq!(analysis.anomalies.len(), 4);

    let period = analysis.period_estimate.expect("four dips give a period");
    assert_eq!(analysis.folded.period, period);
    let cycles = period / (100.0 * HOUR);
    assert_relative_eq!(cycles, cycles.round(), epsilon = 1e-9);
    assert!(cycles.round() >= 1.0);

    // every dip sample lands in the same narrow phase window
    let dip_phases: Vec<f64> = analysis
        .folded
        .phase
        .iter()
        .zip(&analysis.folded.flux)
        .filter(|(_, &f)| f < -0.05)
        .map(|(&p, _)| p)
        .collect();
    assert_eq!(dip_phases.len(), 20);
    let spread = dip_phases.iter().cloned().fold(f64::MIN, f64::max)
        - dip_phases.iter().cloned().fold(f64::MAX, f64::min);
    assert!(spread < 5.0 * HOUR / period + 1e-9);
}

// ============================================================================
// Multiple sources and segments
// ============================================================================

#[test]
fn merged_sources_split_into_segments() {
    let late_time = hourly(100, 20.0);
    let late_flux = vec![1.0; 100];
    let early_time = hourly(100, 0.0);
    let early_flux = vec![1.0; 100];

    let analysis = Pipeline::default()
        .run(&[(&late_time, &late_flux), (&early_time, &early_flux)])
        .unwrap();

    assert_eq!(analysis.raw.len(), 200);
    assert_relative_eq!(analysis.raw.time()[0], 0.0);

    let segments = &analysis.segments;
    assert_eq!(segments.len(), 2);
    assert_eq!((segments[0].start_index, segments[0].end_index), (0, 100));
    assert_eq!((segments[1].start_index, segments[1].end_index), (100, 200));
    assert_relative_eq!(segments[1].start_time, 20.0);

    // the gap is interpolated on the grid, so it is much longer than the input
    assert!(analysis.detrended.len() > 500);
    assert!(analysis.transits.is_empty());
}

#[test]
fn custom_gap_threshold_from_json() {
    let config = PipelineConfig::from_json(r#"{ "segment": { "gap_threshold_days": 30.0 } }"#)
        .unwrap();
    let a_time = hourly(100, 0.0);
    let b_time = hourly(100, 20.0);
    let flux = vec![1.0; 100];

    let analysis = analyze(&[(&a_time, &flux), (&b_time, &flux)], &config).unwrap();
    assert_eq!(analysis.segments.len(), 1);
}

#[test]
fn non_finite_samples_are_dropped() {
    let time = hourly(120, 0.0);
    let mut flux = vec![1.0; 120];
    flux[3] = f64::NAN;
    flux[77] = f64::INFINITY;

    let analysis = Pipeline::default().run(&[(&time, &flux)]).unwrap();
    assert_eq!(analysis.raw.len(), 118);
    assert!(analysis.detrended.flux().iter().all(|f| f.is_finite()));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn no_sources_is_empty_data() {
    let err = Pipeline::default().run(&[]).unwrap_err();
    assert_eq!(err, LightCurveError::EmptyData);
}

#[test]
fn mismatched_source_is_rejected() {
    let time = hourly(100, 0.0);
    let flux = vec![1.0; 99];
    let err = Pipeline::default().run(&[(&time, &flux)]).unwrap_err();
    assert_eq!(
        err,
        LightCurveError::DimensionMismatch {
            expected: 100,
            got: 99
        }
    );
}

#[test]
fn all_nan_input_is_insufficient() {
    let time = hourly(100, 0.0);
    let flux = vec![f64::NAN; 100];
    let err = Pipeline::default().run(&[(&time, &flux)]).unwrap_err();
    assert_eq!(err, LightCurveError::InsufficientData { needed: 50, got: 0 });
}

#[test]
fn identical_timestamps_are_degenerate() {
    let time = vec![5.0; 80];
    let flux = vec![1.0; 80];
    let err = Pipeline::default().run(&[(&time, &flux)]).unwrap_err();
    assert!(matches!(err, LightCurveError::DegenerateSeries(_)));
}
