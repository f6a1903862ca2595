//! Python bindings for additive synthesis

use numpy::PyArray1;
use pyo3::prelude::*;

use super::analysis_bindings::PyTrack;
use crate::model::Track;
use crate::synthesis::{SynthConfig, Synthesizer};

/// Additive synthesizer exposed to Python
#[pyclass(name = "Synthesizer")]
pub struct PySynthesizer {
    synth: Synthesizer,
}

#[pymethods]
impl PySynthesizer {
    /// Create a new synthesizer
    ///
    /// Args:
    ///     frame_len: Samples per frame (analysis hop size)
    ///     sampling_rate: Output sample rate in Hz
    #[new]
    #[pyo3(signature = (frame_len=512, sampling_rate=44100.0))]
    fn new(frame_len: usize, sampling_rate: f64) -> PyResult<Self> {
        let synth = Synthesizer::new(SynthConfig {
            frame_len,
            sampling_rate,
        })?;
        Ok(Self { synth })
    }

    /// Render tracks to a normalized sample buffer
    ///
    /// Args:
    ///     tracks: List of Track objects
    ///
    /// Returns:
    ///     Samples in [-1, 1] as numpy array
    fn synthesize<'py>(&self, py: Python<'py>, tracks: Vec<PyTrack>) -> &'py PyArray1<f64> {
        let tracks: Vec<Track> = tracks.into_iter().map(|t| t.track).collect();
        PyArray1::from_vec(py, self.synth.synthesize(&tracks))
    }

    /// Get current frame length
    fn get_frame_len(&self) -> usize {
        self.synth.config().frame_len
    }

    /// Get current sampling rate
    fn get_sampling_rate(&self) -> f64 {
        self.synth.config().sampling_rate
    }
}
