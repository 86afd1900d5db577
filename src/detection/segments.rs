//! Observation-segment detection.
//!
//! Space telescopes deliver light curves in separate observing blocks
//! (quarters, sectors) with multi-day gaps between them. After merging
//! several uploads into one curve, this module recovers those blocks from
//! the gaps in the time stamps.

use serde::{Deserialize, Serialize};

use crate::config::SegmentConfig;

/// A contiguous block of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position of the segment in time order, starting at 0.
    pub index: usize,
    /// First sample index (inclusive).
    pub start_index: usize,
    /// One past the last sample index.
    pub end_index: usize,
    /// Time of the first sample.
    pub start_time: f64,
    /// Time of the last sample.
    pub end_time: f64,
    /// Midpoint of `start_time` and `end_time`.
    pub center_time: f64,
    /// Number of samples in the segment.
    pub point_count: usize,
}

impl Segment {
    fn new(index: usize, time: &[f64], start_index: usize, end_index: usize) -> Self {
        let start_time = time[start_index];
        let end_time = time[end_index - 1];
        Self {
            index,
            start_index,
            end_index,
            start_time,
            end_time,
            center_time: 0.5 * (start_time + end_time),
            point_count: end_index - start_index,
        }
    }

    /// Duration covered by the segment in days.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Check whether a sample index belongs to the segment.
    pub fn contains_index(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// Split a sorted time axis at gaps longer than the configured threshold.
///
/// The returned segments partition `0..time.len()` in order. An empty time
/// axis yields no segments.
pub fn detect_segments(time: &[f64], config: &SegmentConfig) -> Vec<Segment> {
    if time.is_empty() {
        return Vec::new();
    }

    let mut boundaries: Vec<usize> = time
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1] - pair[0] > config.gap_threshold_days)
        .map(|(i, _)| i + 1)
        .collect();
    boundaries.insert(0, 0);
    boundaries.push(time.len());

    boundaries
        .windows(2)
        .enumerate()
        .map(|(index, bounds)| Segment::new(index, time, bounds[0], bounds[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn two_clusters_give_two_segments() {
        let mut time: Vec<f64> = (0..50).map(|i| i as f64 * 0.02).collect();
        time.extend((0..30).map(|i| 20.0 + i as f64 * 0.02));
        let segments = detect_segments(&time, &SegmentConfig::default());

        assert_eq!(segments.len(), 2);
        assert_eq!((segments[0].start_index, segments[0].end_index), (0, 50));
        assert_eq!((segments[1].start_index, segments[1].end_index), (50, 80));
        assert_eq!(segments[1].index, 1);
        assert_eq!(segments[1].point_count, 30);
        assert_relative_eq!(segments[1].start_time, 20.0);
        assert_relative_eq!(segments[0].center_time, 0.49, epsilon = 1e-12);
    }

    #[test]
    fn gap_equal_to_threshold_does_not_split() {
        let time = [0.0, 1.0, 6.0, 7.0];
        let segments = detect_segments(&time, &SegmentConfig::default());
        assert_eq!(segments.len(), 1);
        assert_relative_eq!(segments[0].duration(), 7.0);
    }

    #[test]
    fn every_gap_can_split() {
        let time = [0.0, 10.0, 20.0];
        let segments = detect_segments(&time, &SegmentConfig::default());
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.point_count == 1));
        assert_relative_eq!(segments[2].center_time, 20.0);
        assert!(segments[1].contains_index(1));
        assert!(!segments[1].contains_index(2));
    }

    #[test]
    fn empty_input_gives_no_segments() {
        assert!(detect_segments(&[], &SegmentConfig::default()).is_empty());
    }
}
