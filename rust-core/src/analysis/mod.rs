//! Spectral analysis: peak picking and partial tracking

pub mod peaks;
pub mod tracking;

pub use peaks::{detect_peaks, DetectorConfig, PeakDetector};
pub use tracking::{track_partials, PartialTracker, TrackerConfig, TrackingStats};
