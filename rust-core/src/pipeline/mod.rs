//! One-shot analysis/resynthesis pipeline
//!
//! Chains peak detection, partial tracking and additive synthesis so the
//! whole model runs from a single spectrogram in one call.

use ndarray::ArrayView2;
use tracing::debug;

use crate::analysis::{DetectorConfig, PartialTracker, PeakDetector, TrackerConfig, TrackingStats};
use crate::error::Result;
use crate::model::{Frame, Track};
use crate::synthesis::{SynthConfig, Synthesizer};

/// Configuration for all three stages
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    pub detector: DetectorConfig,
    pub tracker: TrackerConfig,
    pub synth: SynthConfig,
}

impl ModelConfig {
    /// One sample rate for analysis and synthesis
    ///
    /// `max_peaks` caps frames at detection only; the tracker then sees
    /// frames that already fit.
    pub fn shared(
        sample_rate: f64,
        frame_len: usize,
        threshold: f64,
        matching_radius: f64,
        max_peaks: Option<usize>,
    ) -> Self {
        Self {
            detector: DetectorConfig {
                sample_rate,
                threshold,
                max_peaks,
            },
            tracker: TrackerConfig {
                matching_radius,
                max_peaks: None,
            },
            synth: SynthConfig {
                frame_len,
                sampling_rate: sample_rate,
            },
        }
    }

    /// Validate every stage
    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        self.tracker.validate()?;
        self.synth.validate()
    }
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Detected peaks, one frame per spectrogram row
    pub frames: Vec<Frame>,

    /// Linked partials
    pub tracks: Vec<Track>,

    /// Normalized resynthesis
    pub samples: Vec<f64>,

    /// Tracker counters
    pub stats: TrackingStats,
}

/// Spectrogram in, resynthesized samples out
#[derive(Debug, Clone)]
pub struct SinusoidalModel {
    detector: PeakDetector,
    tracker: PartialTracker,
    synth: Synthesizer,
}

impl SinusoidalModel {
    /// Build all stages, validating every configuration first
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: PeakDetector::new(config.detector)?,
            tracker: PartialTracker::new(config.tracker)?,
            synth: Synthesizer::new(config.synth)?,
        })
    }

    /// Detect and track without synthesizing
    pub fn analyze(&self, spectrogram: ArrayView2<f64>) -> Result<(Vec<Frame>, Vec<Track>, TrackingStats)> {
        let frames = self.detector.detect(spectrogram)?;
        let (tracks, stats) = self.tracker.track_with_stats(&frames);
        Ok((frames, tracks, stats))
    }

    /// Run the full model
    ///
    /// # Arguments
    /// * `spectrogram` - Magnitudes, frames × bins
    pub fn run(&self, spectrogram: ArrayView2<f64>) -> Result<ModelOutput> {
        let (frames, tracks, stats) = self.analyze(spectrogram)?;
        let samples = self.synth.synthesize(&tracks);

        debug!(
            frames = frames.len(),
            peaks = frames.iter().map(Vec::len).sum::<usize>(),
            tracks = tracks.len(),
            samples = samples.len(),
            "model run finished"
        );

        Ok(ModelOutput {
            frames,
            tracks,
            samples,
            stats,
        })
    }

    pub fn detector(&self) -> &PeakDetector {
        &self.detector
    }

    pub fn tracker(&self) -> &PartialTracker {
        &self.tracker
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synth
    }

    /// Current configuration of all stages
    pub fn config(&self) -> ModelConfig {
        ModelConfig {
            detector: self.detector.config().clone(),
            tracker: self.tracker.config().clone(),
            synth: self.synth.config().clone(),
        }
    }

    /// Replace the configuration of all stages
    ///
    /// Nothing changes if any stage rejects its new configuration.
    pub fn update_config(&mut self, config: ModelConfig) -> Result<()> {
        *self = Self::new(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use ndarray::Array2;

    fn config(frame_len: usize) -> ModelConfig {
        ModelConfig {
            detector: DetectorConfig {
                sample_rate: 8000.0,
                threshold: 0.1,
                max_peaks: None,
            },
            tracker: TrackerConfig::default(),
            synth: SynthConfig {
                frame_len,
                sampling_rate: 8000.0,
            },
        }
    }

    #[test]
    fn test_steady_partial_roundtrip() {
        // 64 bins at 8 kHz: 62.5 Hz per bin, peak at bin 8 = 500 Hz
        let mut spec = Array2::<f64>::zeros((6, 64));
        spec.column_mut(8).fill(1.0);

        let model = SinusoidalModel::new(config(80)).unwrap();
        let out = model.run(spec.view()).unwrap();

        assert!(out.frames.iter().all(|f| f.len() == 1 && f[0].freq == 500.0));
        assert_eq!(out.tracks.len(), 1);
        assert_eq!(out.tracks[0].len(), 6);
        assert_eq!(out.stats.deaths, 0);
        assert_eq!(out.samples.len(), 6 * 80);

        let peak = out.samples.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_silent_spectrogram() {
        let spec = Array2::<f64>::zeros((4, 32));
        let out = SinusoidalModel::new(config(16)).unwrap().run(spec.view()).unwrap();

        assert!(out.frames.iter().all(Vec::is_empty));
        assert!(out.tracks.is_empty());
        assert!(out.samples.is_empty());
    }

    #[test]
    fn test_shared_config_caps_once() {
        let config = ModelConfig::shared(8000.0, 64, 0.1, 150.0, Some(2));
        assert_eq!(config.detector.max_peaks, Some(2));
        assert_eq!(config.tracker.max_peaks, None);
        assert_eq!(config.tracker.matching_radius, 150.0);
        assert_eq!(config.synth.sampling_rate, 8000.0);

        // Three peaks per frame, only the two highest survive detection
        let mut spec = Array2::<f64>::zeros((3, 64));
        for bin in [8, 24, 40] {
            spec.column_mut(bin).fill(1.0);
        }
        let out = SinusoidalModel::new(config).unwrap().run(spec.view()).unwrap();
        assert!(out.frames.iter().all(|f| f.len() == 2 && f[0].freq == 1500.0));
        assert_eq!(out.tracks.len(), 2);
    }

    #[test]
    fn test_update_config_is_atomic() {
        let mut model = SinusoidalModel::new(config(16)).unwrap();
        let mut bad = config(0);
        bad.detector.threshold = 0.5;

        assert_eq!(model.update_config(bad), Err(ModelError::InvalidFrameLength));
        assert_eq!(model.config(), config(16));

        model.update_config(config(32)).unwrap();
        assert_eq!(model.synthesizer().config().frame_len, 32);
    }
}
