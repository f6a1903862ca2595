//! Additive resynthesis from partial tracks

pub mod additive;
pub mod normalize;

pub use additive::{synthesize, SynthConfig, Synthesizer};
pub use normalize::normalize_peak;
