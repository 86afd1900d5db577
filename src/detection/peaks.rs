//! One-dimensional peak finding with prominence and width measurement.
//!
//! Peaks are found in three passes:
//! 1. local maxima, where a flat top counts once at its midpoint;
//! 2. minimum separation, where higher peaks suppress lower neighbours;
//! 3. minimum prominence, measured against the higher of the two bases.
//!
//! Widths are measured at a fraction of the prominence below the peak, with
//! the crossing points linearly interpolated between samples.

use std::cmp::Ordering;

/// A detected peak.
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    /// Sample index of the peak (plateau midpoint for flat tops).
    pub index: usize,
    /// Signal value at the peak.
    pub height: f64,
    /// Height above the higher of the two surrounding bases.
    pub prominence: f64,
    /// Index of the lowest point between the peak and a higher sample on the left.
    pub left_base: usize,
    /// Same on the right.
    pub right_base: usize,
    /// Interpolated left crossing of the width line.
    pub left_ip: f64,
    /// Interpolated right crossing of the width line.
    pub right_ip: f64,
}

impl Peak {
    /// Width in samples at the measured relative height.
    pub fn width(&self) -> f64 {
        self.right_ip - self.left_ip
    }
}

/// Options for [`find_peaks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakOptions {
    /// Peaks with a smaller prominence are discarded.
    pub min_prominence: f64,
    /// Minimum index distance between kept peaks (at least 1).
    pub min_distance: usize,
    /// Fraction of the prominence below the peak at which width is measured.
    pub rel_height: f64,
}

impl Default for PeakOptions {
    fn default() -> Self {
        Self {
            min_prominence: 0.0,
            min_distance: 1,
            rel_height: 0.5,
        }
    }
}

/// Indices of local maxima. Flat tops are reported once, at their midpoint.
/// The first and last samples are never maxima.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let n = x.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let last = n - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Drop peaks closer than `distance` samples to a higher peak.
///
/// Peaks are visited from highest to lowest; on equal heights the earlier
/// peak wins. `peaks` must be sorted ascending and the result is too.
pub fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 || peaks.len() < 2 {
        return peaks.to_vec();
    }
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| {
        x[peaks[b]]
            .partial_cmp(&x[peaks[a]])
            .unwrap_or(Ordering::Equal)
    });

    let mut keep = vec![true; peaks.len()];
    for &j in &order {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(&keep)
        .filter(|(_, &k)| k)
        .map(|(&p, _)| p)
        .collect()
}

/// Prominence of the peak at `peak` with its left and right base indices.
///
/// Each side is searched outward until a strictly higher sample or the end
/// of the signal; the base is the lowest point seen on the way.
pub fn prominence(x: &[f64], peak: usize) -> (f64, usize, usize) {
    let top = x[peak];

    let mut left_base = peak;
    let mut left_min = top;
    for i in (0..=peak).rev() {
        if x[i] > top {
            break;
        }
        if x[i] < left_min {
            left_min = x[i];
            left_base = i;
        }
    }

    let mut right_base = peak;
    let mut right_min = top;
    for (i, &v) in x.iter().enumerate().skip(peak) {
        if v > top {
            break;
        }
        if v < right_min {
            right_min = v;
            right_base = i;
        }
    }

    (top - left_min.max(right_min), left_base, right_base)
}

/// Interpolated crossings of the line `rel_height × prominence` below the
/// peak, searched between the peak's bases.
pub fn width_crossings(
    x: &[f64],
    peak: usize,
    prominence: f64,
    left_base: usize,
    right_base: usize,
    rel_height: f64,
) -> (f64, f64) {
    let line = x[peak] - prominence * rel_height;

    let mut i = peak;
    while left_base < i && line < x[i] {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if x[i] < line {
        left_ip += (line - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < right_base && line < x[i] {
        i += 1;
    }
    let mut right_ip = i as f64;
    if x[i] < line {
        right_ip -= (line - x[i]) / (x[i - 1] - x[i]);
    }

    (left_ip, right_ip)
}

/// Find peaks satisfying `options`, in ascending index order.
pub fn find_peaks(x: &[f64], options: &PeakOptions) -> Vec<Peak> {
    let maxima = local_maxima(x);
    let separated = select_by_distance(x, &maxima, options.min_distance);

    separated
        .into_iter()
        .filter_map(|index| {
            let (prom, left_base, right_base) = prominence(x, index);
            if prom < options.min_prominence {
                return None;
            }
            let (left_ip, right_ip) =
                width_crossings(x, index, prom, left_base, right_base, options.rel_height);
            Some(Peak {
                index,
                height: x[index],
                prominence: prom,
                left_base,
                right_base,
                left_ip,
                right_ip,
            })
        })
        .collect()
}
