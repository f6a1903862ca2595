//! PyO3 bindings for Python integration
//!
//! Peaks cross the boundary as `(freq, amp)` tuples, frames as lists of
//! them, spectrograms and sample buffers as numpy arrays.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::ModelError;
use crate::model::Peak;

mod analysis_bindings;
mod model_bindings;
mod synthesis_bindings;

impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

pub(crate) fn peaks_from_py(peaks: Vec<(f64, f64)>) -> Vec<Peak> {
    peaks.into_iter().map(|(freq, amp)| Peak::new(freq, amp)).collect()
}

pub(crate) fn peaks_to_py(peaks: &[Peak]) -> Vec<(f64, f64)> {
    peaks.iter().map(|p| (p.freq, p.amp)).collect()
}

/// Python module definition
#[pymodule]
fn sinusoidal_model(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<analysis_bindings::PyPeakDetector>()?;
    m.add_class::<analysis_bindings::PyPartialTracker>()?;
    m.add_class::<analysis_bindings::PyTrack>()?;
    m.add_class::<synthesis_bindings::PySynthesizer>()?;
    m.add_class::<model_bindings::PySinusoidalModel>()?;

    Ok(())
}
