//! Detectors that run on cleaned or detrended light curves.
//!
//! - [`spike`]: single-sample outlier rejection before resampling
//! - [`segments`]: observing blocks separated by long gaps
//! - [`peaks`]: generic peak finding with prominence and width
//! - [`transit`]: transit candidates from the detrended residual
//! - [`anomaly`]: coarse dimming regions and a period guess

pub mod anomaly;
pub mod peaks;
pub mod segments;
pub mod spike;
pub mod transit;

pub use anomaly::{anomaly_scores, detect_anomalies, estimate_period, AnomalyRegion};
pub use peaks::{find_peaks, Peak, PeakOptions};
pub use segments::{detect_segments, Segment};
pub use spike::{reject_spikes, SpikeRejection};
pub use transit::{detect_transits, noise_scale, TransitCandidate};
