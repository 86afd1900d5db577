//! Utility functions shared by the preprocessing and detection stages.

pub mod stats;

pub use stats::{mad, median, robust_sigma, std_dev, MAD_TO_SIGMA};
