//! Piecewise-interpolated additive synthesis
//!
//! Each pair of consecutive peaks in a track drives one segment of
//! `frame_len` samples. Frequency and amplitude move linearly across the
//! segment; the phase is the integral of the linear frequency ramp, i.e. a
//! quadratic chirp. Phase starts from zero in every segment, so there is a
//! discontinuity at frame boundaries whenever the frequency does not divide
//! the frame evenly.

use std::f64::consts::PI;

use tracing::debug;

use super::normalize::normalize_peak;
use crate::error::{check_sample_rate, ModelError, Result};
use crate::model::Track;

/// Synthesizer configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynthConfig {
    /// Samples per frame (the analysis hop size)
    pub frame_len: usize,

    /// Output sample rate in Hz
    pub sampling_rate: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            frame_len: 512,
            sampling_rate: 44100.0,
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.frame_len == 0 {
            return Err(ModelError::InvalidFrameLength);
        }
        check_sample_rate(self.sampling_rate)
    }
}

/// Renders partial tracks into a sample buffer
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    /// Create a synthesizer, validating the configuration
    pub fn new(config: SynthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Output length for a set of tracks: `frame_len * max(birth + len)`
    pub fn buffer_len(&self, tracks: &[Track]) -> usize {
        let frames = tracks.iter().map(Track::extent).max().unwrap_or(0);
        frames * self.config.frame_len
    }

    /// Render all tracks and normalize the mix to a peak of 1.0
    ///
    /// # Arguments
    /// * `tracks` - Tracks in any order; only each track's own birth matters
    ///
    /// # Returns
    /// Samples in [-1, 1]; all zeros if every track is silent
    pub fn synthesize(&self, tracks: &[Track]) -> Vec<f64> {
        let mut output = vec![0.0; self.buffer_len(tracks)];

        for track in tracks {
            self.render_track(track, &mut output);
        }

        let peak = normalize_peak(&mut output);
        debug!(
            tracks = tracks.len(),
            samples = output.len(),
            peak,
            "synthesis finished"
        );

        output
    }

    /// Add one track into `output` without normalizing
    ///
    /// Segments that would fall past the end of `output` are skipped, so a
    /// caller can render into a per-track scratch buffer or a shared mix.
    pub fn render_track(&self, track: &Track, output: &mut [f64]) {
        let frame_len = self.config.frame_len;
        let samples = frame_len as f64;
        let omega = 2.0 * PI / self.config.sampling_rate;

        for (i, pair) in track.peaks().windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let start = (track.birth() + i) * frame_len;
            let Some(segment) = output.get_mut(start..start + frame_len) else {
                break;
            };

            let step_freq = (to.freq - from.freq) / samples;
            let step_amp = (to.amp - from.amp) / samples;

            for (t, sample) in segment.iter_mut().enumerate() {
                let t = t as f64;
                let amp = from.amp + step_amp * t;
                let phase = omega * t * (from.freq + step_freq * 0.5 * t);
                *sample += 2.0 * amp * phase.sin();
            }
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Update configuration
    pub fn update_config(&mut self, config: SynthConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

/// Synthesize with a one-off synthesizer
///
/// # Arguments
/// * `tracks` - Partial tracks
/// * `frame_len` - Samples per frame
/// * `sampling_rate` - Output sample rate in Hz
pub fn synthesize(tracks: &[Track], frame_len: usize, sampling_rate: f64) -> Result<Vec<f64>> {
    let synth = Synthesizer::new(SynthConfig {
        frame_len,
        sampling_rate,
    })?;
    Ok(synth.synthesize(tracks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Peak;

    fn steady(freq: f64, amp: f64, frames: usize) -> Track {
        Track::new(0, vec![Peak::new(freq, amp); frames]).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(synthesize(&[], 128, 44100.0).unwrap().is_empty());
    }

    #[test]
    fn test_sine_period() {
        let output = synthesize(&[steady(440.0, 1.0, 2)], 100, 44100.0).unwrap();

        assert_eq!(output.len(), 200);
        let peak = output.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-12);

        // Half a period of 440 Hz is ~50.1 samples
        assert_eq!(output[0], 0.0);
        let falling = (1..99).find(|&i| output[i] > 0.0 && output[i + 1] <= 0.0);
        assert_eq!(falling, Some(50));

        // The last frame has no following peak, so nothing is rendered there
        assert!(output[100..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_render_track_unnormalized() {
        let synth = Synthesizer::new(SynthConfig {
            frame_len: 64,
            sampling_rate: 8000.0,
        })
        .unwrap();
        let track = steady(1000.0, 0.25, 3);
        let mut output = vec![0.0; synth.buffer_len(&[track.clone()])];
        synth.render_track(&track, &mut output);

        for t in [1, 5, 17, 63] {
            let expected = 0.5 * (2.0 * PI * 1000.0 * t as f64 / 8000.0).sin();
            assert!((output[t] - expected).abs() < 1e-12);
        }
        // Phase restarts at every segment boundary
        assert_eq!(output[64], 0.0);
        assert!((output[65] - output[1]).abs() < 1e-12);
    }

    #[test]
    fn test_render_skips_segments_past_buffer() {
        let synth = Synthesizer::new(SynthConfig {
            frame_len: 10,
            sampling_rate: 1000.0,
        })
        .unwrap();
        let mut short = vec![0.0; 15];
        synth.render_track(&steady(100.0, 1.0, 4), &mut short);
        assert!(short[..10].iter().any(|&s| s != 0.0));
        assert!(short[10..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_fade_in_ramp() {
        let track = Track::new(0, vec![Peak::silent(200.0), Peak::new(200.0, 1.0)]).unwrap();
        let synth = Synthesizer::new(SynthConfig {
            frame_len: 400,
            sampling_rate: 8000.0,
        })
        .unwrap();
        let mut output = vec![0.0; 800];
        synth.render_track(&track, &mut output);

        // 200 Hz at 8 kHz: positive peaks every 40 samples, starting at 10
        let early = output[10];
        let late = output[370];
        assert!(early > 0.0 && late > early * 10.0);
    }

    #[test]
    fn test_chirp_frequency_rises() {
        let track = Track::new(0, vec![Peak::new(100.0, 1.0), Peak::new(900.0, 1.0)]).unwrap();
        let output = synthesize(&[track], 4000, 8000.0).unwrap();

        let crossings = |range: std::ops::Range<usize>| {
            range
                .filter(|&i| output[i] <= 0.0 && output[i + 1] > 0.0)
                .count()
        };
        assert!(crossings(3000..3999) > 2 * crossings(0..1000));
    }

    #[test]
    fn test_tracks_superpose() {
        let a = steady(300.0, 0.5, 3);
        let b = Track::new(1, vec![Peak::new(300.0, 0.5); 2]).unwrap();
        let synth = Synthesizer::new(SynthConfig {
            frame_len: 50,
            sampling_rate: 8000.0,
        })
        .unwrap();

        let mut mix = vec![0.0; 150];
        synth.render_track(&a, &mut mix);
        synth.render_track(&b, &mut mix);

        let mut alone = vec![0.0; 150];
        synth.render_track(&a, &mut alone);

        for i in 50..100 {
            assert!((mix[i] - 2.0 * alone[i]).abs() < 1e-12);
        }
        assert_eq!(mix[..50], alone[..50]);
    }

    #[test]
    fn test_silent_tracks() {
        let track = Track::new(2, vec![Peak::silent(440.0); 3]).unwrap();
        let output = synthesize(&[track], 32, 44100.0).unwrap();

        assert_eq!(output.len(), 5 * 32);
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_buffer_len() {
        let synth = Synthesizer::new(SynthConfig {
            frame_len: 10,
            sampling_rate: 44100.0,
        })
        .unwrap();
        let tracks = vec![
            Track::new(3, vec![Peak::silent(100.0); 2]).unwrap(),
            Track::new(0, vec![Peak::silent(100.0); 4]).unwrap(),
        ];
        assert_eq!(synth.buffer_len(&tracks), 50);
        assert_eq!(synth.buffer_len(&[]), 0);
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(synthesize(&[], 0, 44100.0), Err(ModelError::InvalidFrameLength));
        assert!(matches!(
            synthesize(&[], 64, 0.0),
            Err(ModelError::InvalidSampleRate(_))
        ));
    }
}
