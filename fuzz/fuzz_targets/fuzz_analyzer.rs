//! Fuzz target: `OscillometricAnalyzer::analyze`
//!
//! Interprets the input as a series of little-endian `i16` pressures and
//! runs both the clipped and the zero-padded analysis. Neither may panic,
//! and any vitals returned must span at least two beats.
//!
//! cargo fuzz run fuzz_analyzer

#![no_main]

use cuffcore::analysis::OscillometricAnalyzer;
use cuffcore::config::{MeasurementConfig, SERIES_CAPACITY};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let series: Vec<i32> = data
        .chunks_exact(2)
        .take(SERIES_CAPACITY)
        .map(|c| i32::from(i16::from_le_bytes([c[0], c[1]])))
        .collect();

    let padded = MeasurementConfig {
        pad_analysis_to_capacity: true,
        ..MeasurementConfig::DEFAULT
    };
    for analyzer in [
        OscillometricAnalyzer::default(),
        OscillometricAnalyzer::new(&padded),
    ] {
        if let Ok(v) = analyzer.analyze(&series) {
            assert!(v.beats >= 2);
            assert!(v.last_beat > v.first_beat);
        }
    }
});
