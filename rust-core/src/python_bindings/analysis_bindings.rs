//! Python bindings for peak detection and partial tracking

use numpy::{PyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use super::{peaks_from_py, peaks_to_py};
use crate::analysis::{DetectorConfig, PartialTracker, PeakDetector, TrackerConfig};
use crate::model::Track;

/// Partial track exposed to Python
#[pyclass(name = "Track")]
#[derive(Clone)]
pub struct PyTrack {
    pub(crate) track: Track,
}

impl From<Track> for PyTrack {
    fn from(track: Track) -> Self {
        Self { track }
    }
}

#[pymethods]
impl PyTrack {
    /// Create a track by hand
    ///
    /// Args:
    ///     birth: Frame index of the first peak
    ///     peaks: List of (freq, amp) tuples, one per frame
    #[new]
    fn new(birth: usize, peaks: Vec<(f64, f64)>) -> PyResult<Self> {
        Ok(Track::new(birth, peaks_from_py(peaks))?.into())
    }

    #[getter]
    fn birth(&self) -> usize {
        self.track.birth()
    }

    /// List of (freq, amp) tuples
    #[getter]
    fn peaks(&self) -> Vec<(f64, f64)> {
        peaks_to_py(self.track.peaks())
    }

    /// Frequency envelope as numpy array
    fn frequencies<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.track.frequency_envelope())
    }

    /// Amplitude envelope as numpy array
    fn amplitudes<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.track.amplitude_envelope())
    }

    fn mean_frequency(&self) -> f64 {
        self.track.mean_frequency()
    }

    fn __len__(&self) -> usize {
        self.track.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Track(birth={}, frames={}, last_freq={:.1})",
            self.track.birth(),
            self.track.len(),
            self.track.last_freq()
        )
    }
}

/// Peak detector exposed to Python
#[pyclass(name = "PeakDetector")]
pub struct PyPeakDetector {
    detector: PeakDetector,
}

#[pymethods]
impl PyPeakDetector {
    /// Create a new peak detector
    ///
    /// Args:
    ///     sample_rate: Sample rate in Hz of the analysed audio
    ///     threshold: Minimum magnitude of a peak
    ///     max_peaks: Keep only the highest-frequency peaks of each frame
    #[new]
    #[pyo3(signature = (sample_rate=44100.0, threshold=0.0, max_peaks=None))]
    fn new(sample_rate: f64, threshold: f64, max_peaks: Option<usize>) -> PyResult<Self> {
        let detector = PeakDetector::new(DetectorConfig {
            sample_rate,
            threshold,
            max_peaks,
        })?;
        Ok(Self { detector })
    }

    /// Detect peaks in a magnitude spectrogram
    ///
    /// Args:
    ///     spectrogram: 2-D numpy array, frames x bins
    ///
    /// Returns:
    ///     One list of (freq, amp) tuples per frame
    fn detect(&self, spectrogram: PyReadonlyArray2<f64>) -> PyResult<Vec<Vec<(f64, f64)>>> {
        let frames = self.detector.detect(spectrogram.as_array())?;
        Ok(frames.iter().map(|frame| peaks_to_py(frame)).collect())
    }
}

/// Partial tracker exposed to Python
#[pyclass(name = "PartialTracker")]
pub struct PyPartialTracker {
    tracker: PartialTracker,
}

#[pymethods]
impl PyPartialTracker {
    /// Create a new partial tracker
    ///
    /// Args:
    ///     matching_radius: Largest frequency jump in Hz between frames
    ///     max_peaks: Keep only the highest-frequency peaks of each frame
    #[new]
    #[pyo3(signature = (matching_radius=200.0, max_peaks=None))]
    fn new(matching_radius: f64, max_peaks: Option<usize>) -> PyResult<Self> {
        let tracker = PartialTracker::new(TrackerConfig {
            matching_radius,
            max_peaks,
        })?;
        Ok(Self { tracker })
    }

    /// Link per-frame peaks into tracks
    ///
    /// Args:
    ///     frames: List of frames, each a list of (freq, amp) tuples
    ///
    /// Returns:
    ///     List of Track objects, dead tracks first
    fn track(&self, frames: Vec<Vec<(f64, f64)>>) -> Vec<PyTrack> {
        let frames: Vec<_> = frames.into_iter().map(peaks_from_py).collect();
        self.tracker
            .track(&frames)
            .into_iter()
            .map(PyTrack::from)
            .collect()
    }
}
