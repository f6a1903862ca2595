//! Sinusoidal Model - Spectral Peak Tracking and Additive Resynthesis
//!
//! McAulay-Quatieri style sinusoidal modeling: spectral peaks are picked frame
//! by frame, linked across frames into partials, and resynthesized with
//! interpolated additive synthesis. Optional Python bindings behind the
//! `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod analysis;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod synthesis;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use analysis::{detect_peaks, track_partials, PartialTracker, PeakDetector};
pub use error::{ModelError, Result};
pub use model::{Frame, Peak, Track};
pub use pipeline::{ModelConfig, ModelOutput, SinusoidalModel};
pub use synthesis::{synthesize, Synthesizer};
