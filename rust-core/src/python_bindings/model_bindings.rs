//! Python bindings for the full analysis/resynthesis pipeline

use numpy::{PyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use super::analysis_bindings::PyTrack;
use crate::pipeline::{ModelConfig, SinusoidalModel};

/// Sinusoidal model pipeline exposed to Python
#[pyclass(name = "SinusoidalModel")]
pub struct PySinusoidalModel {
    model: SinusoidalModel,
}

#[pymethods]
impl PySinusoidalModel {
    /// Create a new pipeline
    ///
    /// Args:
    ///     sample_rate: Sample rate in Hz, used for analysis and synthesis
    ///     frame_len: Samples per frame (analysis hop size)
    ///     threshold: Minimum peak magnitude
    ///     matching_radius: Largest frequency jump in Hz between frames
    ///     max_peaks: Keep only the highest-frequency peaks of each frame
    #[new]
    #[pyo3(signature = (sample_rate=44100.0, frame_len=512, threshold=0.0, matching_radius=200.0, max_peaks=None))]
    fn new(
        sample_rate: f64,
        frame_len: usize,
        threshold: f64,
        matching_radius: f64,
        max_peaks: Option<usize>,
    ) -> PyResult<Self> {
        let config = ModelConfig::shared(sample_rate, frame_len, threshold, matching_radius, max_peaks);
        Ok(Self {
            model: SinusoidalModel::new(config)?,
        })
    }

    /// Analyse a spectrogram and resynthesize it
    ///
    /// Args:
    ///     spectrogram: 2-D numpy array, frames x bins
    ///
    /// Returns:
    ///     Tuple of (tracks, samples)
    fn run<'py>(
        &self,
        py: Python<'py>,
        spectrogram: PyReadonlyArray2<f64>,
    ) -> PyResult<(Vec<PyTrack>, &'py PyArray1<f64>)> {
        let output = self.model.run(spectrogram.as_array())?;
        let tracks = output.tracks.into_iter().map(PyTrack::from).collect();
        Ok((tracks, PyArray1::from_vec(py, output.samples)))
    }
}
