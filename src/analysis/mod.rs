//! Post-hoc signal analysis of a completed deflation.

pub mod oscillometric;

pub use oscillometric::{OscillometricAnalyzer, VitalsResult};
