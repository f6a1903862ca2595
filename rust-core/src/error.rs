//! Error types for the sinusoidal model
//!
//! Every stage validates its inputs up front and reports problems through
//! [`ModelError`]; nothing is processed once validation fails.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Spectrogram frames need at least 3 bins (found: {bins})")]
    InvalidSpectrogram { bins: usize },

    #[error("Sample rate must be positive and finite (found: {0})")]
    InvalidSampleRate(f64),

    #[error("Peak threshold must be non-negative (found: {0})")]
    InvalidThreshold(f64),

    #[error("Matching radius must be non-negative (found: {0} Hz)")]
    InvalidMatchingRadius(f64),

    #[error("Synthesis frame length must be at least one sample")]
    InvalidFrameLength,

    #[error("A track needs at least one peak")]
    EmptyTrack,
}

/// Reject sample rates that are zero, negative, or not finite
pub(crate) fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidSampleRate(sample_rate))
    }
}
