//! Peak normalization

use tracing::debug;

/// Scale a buffer so its largest absolute sample is exactly 1.0
///
/// A silent buffer is left untouched.
///
/// # Returns
/// The peak absolute value before scaling
pub fn normalize_peak(buffer: &mut [f64]) -> f64 {
    let peak = buffer.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));

    if peak > 0.0 {
        for s in buffer.iter_mut() {
            *s /= peak;
        }
    } else {
        debug!(samples = buffer.len(), "silent buffer, skipping normalization");
    }

    peak
}
