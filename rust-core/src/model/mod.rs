//! Data model shared by the analysis and synthesis stages

pub mod peak;
pub mod track;

pub use peak::{Frame, Peak};
pub use track::Track;
