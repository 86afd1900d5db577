//! Resampling of irregular samples onto a uniform time grid.
//!
//! Samples are binned by `floor((t - t_min) / step)`. Fluxes landing in the
//! same bin are summed, which preserves additive photometric counts. Empty
//! bins are linearly interpolated over bin index.

use log::debug;

use crate::config::ResampleConfig;
use crate::core::{LightCurve, UniformGrid, MIN_GRID_POINTS};
use crate::error::{LightCurveError, Result};

/// Relative slack added before flooring so that `k * step` lands in bin `k`
/// despite floating-point under-shoot.
const BIN_GUARD: f64 = 1e-9;

/// Bin index of `time` on a grid starting at `start` with spacing `step`.
pub fn bin_index(time: f64, start: f64, step: f64) -> usize {
    ((time - start) / step + BIN_GUARD).floor().max(0.0) as usize
}

/// Number of grid points `k * step` with `k * step < span + step / 2`.
///
/// The grid overshoots the latest sample by at most half a step, so a
/// trailing fraction of a bin beyond one half still gets its own point.
pub fn grid_len(span: f64, step: f64) -> usize {
    (span / step + 0.5).ceil().max(1.0) as usize
}

/// Resample a cleaned light curve onto a uniform grid.
///
/// The grid starts at the earliest sample and has [`grid_len`] points, so
/// it ends within half a step of the latest sample. A trailing bin that no
/// sample reaches takes the value of its filled neighbour.
///
/// # Errors
/// [`LightCurveError::DegenerateSeries`] if the step is not positive, the
/// grid would have fewer than three points, or no bin receives a sample.
pub fn resample(curve: &LightCurve, config: &ResampleConfig) -> Result<UniformGrid> {
    let step = config.step_days;
    if !(step.is_finite() && step > 0.0) {
        return Err(LightCurveError::DegenerateSeries(format!(
            "resample step must be positive, got {step}"
        )));
    }
    let (start, end) = match (curve.start_time(), curve.end_time()) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(LightCurveError::DegenerateSeries(
                "no samples to resample".to_string(),
            ))
        }
    };

    let bins = (end - start) / step;
    if !bins.is_finite() || bins >= usize::MAX as f64 {
        return Err(LightCurveError::DegenerateSeries(format!(
            "span {} days cannot be gridded at step {step}",
            end - start
        )));
    }
    let n = grid_len(end - start, step);
    if n < MIN_GRID_POINTS {
        return Err(LightCurveError::DegenerateSeries(format!(
            "time span {:.6} days gives {n} grid points, need at least {MIN_GRID_POINTS}",
            end - start
        )));
    }

    let mut sums = vec![0.0; n];
    let mut filled = vec![false; n];
    for sample in curve.samples() {
        let k = bin_index(sample.time, start, step).min(n - 1);
        sums[k] += sample.flux;
        filled[k] = true;
    }

    let flux = interpolate_gaps(&sums, &filled).ok_or_else(|| {
        LightCurveError::DegenerateSeries("every grid bin is empty".to_string())
    })?;

    debug!(
        "resampled {} samples onto {} bins ({} interpolated)",
        curve.len(),
        n,
        filled.iter().filter(|&&f| !f).count()
    );
    UniformGrid::from_parts(start, step, flux, filled)
}

/// Fill unfilled entries by linear interpolation between the nearest filled
/// neighbours; leading and trailing gaps take the nearest filled value.
///
/// Returns `None` when nothing is filled.
pub fn interpolate_gaps(values: &[f64], filled: &[bool]) -> Option<Vec<f64>> {
    let anchors: Vec<usize> = filled
        .iter()
        .enumerate()
        .filter(|(_, &f)| f)
        .map(|(i, _)| i)
        .collect();
    let (&first, &last) = (anchors.first()?, anchors.last()?);

    let mut out = values.to_vec();
    for v in &mut out[..first] {
        *v = values[first];
    }
    for v in &mut out[last + 1..] {
        *v = values[last];
    }
    for pair in anchors.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        let span = (right - left) as f64;
        for (k, v) in out.iter_mut().enumerate().take(right).skip(left + 1) {
            let w = (k - left) as f64 / span;
            *v = values[left] * (1.0 - w) + values[right] * w;
        }
    }
    Some(out)
}
