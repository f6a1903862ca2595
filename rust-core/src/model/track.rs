//! Partial tracks
//!
//! A track holds one peak per frame starting at its birth frame. The tracker
//! only ever appends to a track; once a track is handed out it is never
//! touched again.

use super::peak::Peak;
use crate::error::{ModelError, Result};

/// Trajectory of one sinusoidal partial across consecutive frames
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TrackRepr")
)]
pub struct Track {
    birth: usize,
    peaks: Vec<Peak>,
}

/// Unchecked wire form; deserialized tracks go through `Track::new`
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TrackRepr {
    birth: usize,
    peaks: Vec<Peak>,
}

#[cfg(feature = "serde")]
impl TryFrom<TrackRepr> for Track {
    type Error = ModelError;

    fn try_from(repr: TrackRepr) -> Result<Self> {
        Track::new(repr.birth, repr.peaks)
    }
}

impl Track {
    /// Create a track from an explicit peak sequence
    ///
    /// # Arguments
    /// * `birth` - Frame index of the first peak
    /// * `peaks` - One peak per frame, starting at `birth`
    ///
    /// # Returns
    /// `ModelError::EmptyTrack` if `peaks` is empty
    pub fn new(birth: usize, peaks: Vec<Peak>) -> Result<Self> {
        if peaks.is_empty() {
            return Err(ModelError::EmptyTrack);
        }
        Ok(Self { birth, peaks })
    }

    /// Track started by a peak of the first frame
    pub(crate) fn start(birth: usize, peak: Peak) -> Self {
        Self {
            birth,
            peaks: vec![peak],
        }
    }

    /// Track started mid-signal: a silent entry at the onset frequency, then the peak
    pub(crate) fn fade_in(birth: usize, peak: Peak) -> Self {
        Self {
            birth,
            peaks: vec![Peak::silent(peak.freq), peak],
        }
    }

    pub(crate) fn push(&mut self, peak: Peak) {
        self.peaks.push(peak);
    }

    /// Append the zero-amplitude fade-out entry at the last known frequency
    pub(crate) fn fade_out(&mut self) {
        let freq = self.last_freq();
        self.peaks.push(Peak::silent(freq));
    }

    pub fn birth(&self) -> usize {
        self.birth
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Number of frames covered (never zero)
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Index of the last frame this track covers
    pub fn end_frame(&self) -> usize {
        self.birth + self.peaks.len() - 1
    }

    /// Frame count this track spans in the output timeline (`birth + len`)
    pub fn extent(&self) -> usize {
        self.birth + self.peaks.len()
    }

    /// Current frequency: the frequency of the last entry
    pub fn last_freq(&self) -> f64 {
        self.peaks[self.peaks.len() - 1].freq
    }

    /// True when the last entry is a zero-amplitude fade-out
    pub fn is_finalized_silent(&self) -> bool {
        self.peaks[self.peaks.len() - 1].amp == 0.0
    }

    pub fn frequency_envelope(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.freq).collect()
    }

    pub fn amplitude_envelope(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.amp).collect()
    }

    /// Amplitude-weighted mean frequency
    ///
    /// Falls back to the plain mean when every amplitude is zero.
    pub fn mean_frequency(&self) -> f64 {
        let total_amp: f64 = self.peaks.iter().map(|p| p.amp).sum();
        if total_amp > 0.0 {
            self.peaks.iter().map(|p| p.freq * p.amp).sum::<f64>() / total_amp
        } else {
            self.peaks.iter().map(|p| p.freq).sum::<f64>() / self.peaks.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(Track::new(3, Vec::new()), Err(ModelError::EmptyTrack));
    }

    #[test]
    fn test_fade_in_and_out() {
        let mut track = Track::fade_in(4, Peak::new(300.0, 0.5));
        assert_eq!(track.birth(), 4);
        assert_eq!(track.peaks()[0], Peak::silent(300.0));
        assert!(!track.is_finalized_silent());

        track.push(Peak::new(310.0, 0.4));
        track.fade_out();

        assert_eq!(track.len(), 4);
        assert_eq!(track.end_frame(), 7);
        assert_eq!(track.extent(), 8);
        assert_eq!(track.last_freq(), 310.0);
        assert!(track.is_finalized_silent());
        assert_eq!(track.amplitude_envelope(), vec![0.0, 0.5, 0.4, 0.0]);
        assert_eq!(track.frequency_envelope(), vec![300.0, 300.0, 310.0, 310.0]);
    }

    #[test]
    fn test_mean_frequency() {
        let track = Track::new(
            0,
            vec![Peak::new(100.0, 1.0), Peak::new(200.0, 3.0)],
        )
        .unwrap();
        assert!((track.mean_frequency() - 175.0).abs() < 1e-12);

        let silent = Track::new(0, vec![Peak::silent(100.0), Peak::silent(300.0)]).unwrap();
        assert!((silent.mean_frequency() - 200.0).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let track = Track::new(2, vec![Peak::silent(880.0), Peak::new(880.0, 0.3)]).unwrap();
        let json = serde_json::to_string(&track).unwrap();
        assert_eq!(json, r#"{"birth":2,"peaks":[{"freq":880.0,"amp":0.0},{"freq":880.0,"amp":0.3}]}"#);
        assert_eq!(serde_json::from_str::<Track>(&json).unwrap(), track);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_empty_track() {
        let err = serde_json::from_str::<Track>(r#"{"birth":3,"peaks":[]}"#).unwrap_err();
        assert!(err.to_string().starts_with(&ModelError::EmptyTrack.to_string()));
    }
}
