//! Per-frame spectral peak picking
//!
//! A bin is a peak when its magnitude is strictly greater than both immediate
//! neighbours and strictly greater than the threshold. The edge bins are never
//! peaks. No sub-bin interpolation is done: peak `i` of a frame with `N` bins
//! sits at `i * sample_rate / (2 * N)` Hz.

use ndarray::{ArrayView1, ArrayView2};

use crate::error::{check_sample_rate, ModelError, Result};
use crate::model::{Frame, Peak};

/// Peak detector configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorConfig {
    /// Sample rate in Hz of the audio the spectrogram was computed from
    pub sample_rate: f64,

    /// Minimum magnitude a peak must exceed
    pub threshold: f64,

    /// Keep at most this many peaks per frame.
    /// The highest-frequency peaks are kept, not the loudest.
    pub max_peaks: Option<usize>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            threshold: 0.0,
            max_peaks: None,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate)?;
        // NaN fails the comparison as well
        if !(self.threshold >= 0.0) {
            return Err(ModelError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Converts a magnitude spectrogram into per-frame peak lists
#[derive(Debug, Clone)]
pub struct PeakDetector {
    config: DetectorConfig,
}

impl PeakDetector {
    /// Create a detector, validating the configuration
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Detect peaks in every frame of a spectrogram
    ///
    /// # Arguments
    /// * `spectrogram` - Magnitudes, one row per frame, one column per bin
    ///
    /// # Returns
    /// One ascending-by-frequency [`Frame`] per input row
    pub fn detect(&self, spectrogram: ArrayView2<f64>) -> Result<Vec<Frame>> {
        let (num_frames, num_bins) = spectrogram.dim();
        if num_frames == 0 {
            return Ok(Vec::new());
        }
        if num_bins < 3 {
            return Err(ModelError::InvalidSpectrogram { bins: num_bins });
        }

        Ok(spectrogram
            .rows()
            .into_iter()
            .map(|row| self.detect_frame(row))
            .collect())
    }

    /// Detect peaks in a list of rows that may differ in length
    ///
    /// Every row is validated before any of them is processed.
    pub fn detect_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Frame>> {
        if let Some(short) = rows.iter().find(|row| row.len() < 3) {
            return Err(ModelError::InvalidSpectrogram { bins: short.len() });
        }

        Ok(rows
            .iter()
            .map(|row| self.detect_frame(ArrayView1::from(row.as_slice())))
            .collect())
    }

    /// Detect peaks in a single frame of at least 3 bins
    fn detect_frame(&self, magnitudes: ArrayView1<f64>) -> Frame {
        let num_bins = magnitudes.len();
        let bin_hz = self.config.sample_rate / (2.0 * num_bins as f64);

        let mut peaks: Frame = magnitudes
            .windows(3)
            .into_iter()
            .enumerate()
            .filter_map(|(left, w)| {
                let mag = w[1];
                if mag > w[0] && mag > w[2] && mag > self.config.threshold {
                    Some(Peak::new((left + 1) as f64 * bin_hz, mag))
                } else {
                    None
                }
            })
            .collect();

        if let Some(max_peaks) = self.config.max_peaks {
            keep_highest(&mut peaks, max_peaks);
        }

        peaks
    }

    /// Get current configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Update configuration
    pub fn update_config(&mut self, config: DetectorConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

/// Drop all but the last `max_peaks` entries of an ascending frame
pub(crate) fn keep_highest(peaks: &mut Frame, max_peaks: usize) {
    if peaks.len() > max_peaks {
        peaks.drain(..peaks.len() - max_peaks);
    }
}

/// Detect peaks with a one-off detector
///
/// # Arguments
/// * `spectrogram` - Magnitude matrix (frames × bins)
/// * `sample_rate` - Sample rate in Hz
/// * `threshold` - Minimum magnitude
/// * `max_peaks` - Optional per-frame cap (highest frequencies kept)
pub fn detect_peaks(
    spectrogram: ArrayView2<f64>,
    sample_rate: f64,
    threshold: f64,
    max_peaks: Option<usize>,
) -> Result<Vec<Frame>> {
    let detector = PeakDetector::new(DetectorConfig {
        sample_rate,
        threshold,
        max_peaks,
    })?;
    detector.detect(spectrogram)
}
