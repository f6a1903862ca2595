//! Spectral peaks and frames

/// A local magnitude maximum in one spectrogram frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Peak {
    /// Frequency in Hz
    pub freq: f64,

    /// Linear magnitude
    pub amp: f64,
}

impl Peak {
    pub fn new(freq: f64, amp: f64) -> Self {
        Self { freq, amp }
    }

    /// Same frequency, zero amplitude. Used for fade-in and fade-out entries.
    pub fn silent(freq: f64) -> Self {
        Self { freq, amp: 0.0 }
    }
}

/// Peaks of one time step, ascending by frequency
pub type Frame = Vec<Peak>;
