//! Real-time deflation-rate classifier.
//!
//! Compares the first sample of the current one-second window against the
//! first sample of the previous window and tells the user whether to open
//! or close the valve. The target is roughly 4 mmHg per second.
//!
//! | drop (prev − curr) | rate      |
//! |--------------------|-----------|
//! | `> 6`              | too fast  |
//! | `1 ..= 3`          | too slow  |
//! | `<= 0`, `4 ..= 6`  | ok        |
//!
//! A negative drop happens when a heartbeat lifts the cuff pressure across
//! a window boundary; that is reported as ok, not as a rate problem.

use serde::{Deserialize, Serialize};

use crate::config::MeasurementConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeflationRate {
    TooFast,
    TooSlow,
    Ok,
}

impl DeflationRate {
    /// Two display lines advising the user.
    pub const fn message(self) -> (&'static str, &'static str) {
        match self {
            Self::TooFast => ("Deflation is", "TOO FAST."),
            Self::TooSlow => ("Deflation is", "TOO SLOW."),
            Self::Ok => ("Deflation is OK.", "Maintain speed."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflationRateMonitor {
    too_fast_drop: i32,
    too_slow_drop: i32,
}

impl DeflationRateMonitor {
    pub const fn new(config: &MeasurementConfig) -> Self {
        Self {
            too_fast_drop: config.too_fast_drop_mmhg,
            too_slow_drop: config.too_slow_drop_mmhg,
        }
    }

    /// Classify the drop between the first samples of two adjacent windows.
    pub const fn classify(&self, prev_window_first: i32, curr_window_first: i32) -> DeflationRate {
        let drop = prev_window_first - curr_window_first;
        if drop > self.too_fast_drop {
            DeflationRate::TooFast
        } else if drop > 0 && drop < self.too_slow_drop {
            DeflationRate::TooSlow
        } else {
            DeflationRate::Ok
        }
    }
}

impl Default for DeflationRateMonitor {
    fn default() -> Self {
        Self::new(&MeasurementConfig::DEFAULT)
    }
}
