//! Raw light curve ingestion.

use serde::{Deserialize, Serialize};

use crate::error::{LightCurveError, Result};

/// A single photometric measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observation time in days.
    pub time: f64,
    /// Measured flux in instrument units.
    pub flux: f64,
}

/// A time-ordered series of finite samples for one target.
///
/// Samples are sorted ascending by time. Samples sharing a timestamp (for
/// example from overlapping sources) are all kept, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
}

impl LightCurve {
    /// Build a light curve from one source.
    ///
    /// Non-finite pairs are dropped and the rest sorted by time.
    pub fn new(time: Vec<f64>, flux: Vec<f64>) -> Result<Self> {
        if time.len() != flux.len() {
            return Err(LightCurveError::DimensionMismatch {
                expected: time.len(),
                got: flux.len(),
            });
        }
        Ok(Self::clean_and_sort(time.into_iter().zip(flux)))
    }

    /// Merge several sources of the same target into one light curve.
    ///
    /// Sources are concatenated, non-finite pairs removed and the result
    /// stable-sorted by time. Fails when fewer than `min_points` samples
    /// survive.
    ///
    /// # Example
    /// ```
    /// use transitscan::core::LightCurve;
    ///
    /// let q1_time = [0.0, 0.1, 0.2];
    /// let q1_flux = [1.0, 1.0, f64::NAN];
    /// let q2_time = [10.0, 10.1];
    /// let q2_flux = [0.9, 1.1];
    ///
    /// let curve = LightCurve::from_sources(&[(&q2_time, &q2_flux), (&q1_time, &q1_flux)], 3)
    ///     .unwrap();
    /// assert_eq!(curve.time(), &[0.0, 0.1, 10.0, 10.1]);
    /// ```
    pub fn from_sources(sources: &[(&[f64], &[f64])], min_points: usize) -> Result<Self> {
        if sources.is_empty() {
            return Err(LightCurveError::EmptyData);
        }
        for (time, flux) in sources {
            if time.len() != flux.len() {
                return Err(LightCurveError::DimensionMismatch {
                    expected: time.len(),
                    got: flux.len(),
                });
            }
        }

        let pairs = sources
            .iter()
            .flat_map(|(time, flux)| time.iter().copied().zip(flux.iter().copied()));
        let curve = Self::clean_and_sort(pairs);

        if curve.len() < min_points {
            return Err(LightCurveError::InsufficientData {
                needed: min_points,
                got: curve.len(),
            });
        }
        Ok(curve)
    }

    fn clean_and_sort(pairs: impl Iterator<Item = (f64, f64)>) -> Self {
        let mut samples: Vec<(f64, f64)> = pairs
            .filter(|(t, f)| t.is_finite() && f.is_finite())
            .collect();
        // stable, so equal timestamps keep source order
        samples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let (time, flux) = samples.into_iter().unzip();
        Self { time, flux }
    }

    /// Keep only the samples whose mask entry is `true`.
    pub(crate) fn select(&self, keep: &[bool]) -> Self {
        let (time, flux) = self
            .time
            .iter()
            .zip(&self.flux)
            .zip(keep)
            .filter(|(_, &k)| k)
            .map(|((&t, &f), _)| (t, f))
            .unzip();
        Self { time, flux }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Observation times in days, ascending.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Flux values aligned with [`Self::time`].
    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Iterate over the samples in time order.
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.time
            .iter()
            .zip(&self.flux)
            .map(|(&time, &flux)| Sample { time, flux })
    }

    /// Earliest observation time.
    pub fn start_time(&self) -> Option<f64> {
        self.time.first().copied()
    }

    /// Latest observation time.
    pub fn end_time(&self) -> Option<f64> {
        self.time.last().copied()
    }

    /// Time covered from first to last sample (0 when empty).
    pub fn span(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }
}
