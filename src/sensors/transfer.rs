//! Raw-code to mmHg transfer function.
//!
//! Linear map of the sensor's 24-bit output onto its pressure range with
//! truncating integer division. Out-of-range codes are not clamped: a code
//! below `raw_min` yields a negative pressure, one above `raw_max` yields
//! more than `p_max`.

use crate::config::SensorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureConverter {
    raw_min: i64,
    raw_max: i64,
    p_min: i64,
    p_max: i64,
}

impl PressureConverter {
    pub const fn new(config: &SensorConfig) -> Self {
        Self {
            raw_min: config.raw_min as i64,
            raw_max: config.raw_max as i64,
            p_min: config.p_min_mmhg as i64,
            p_max: config.p_max_mmhg as i64,
        }
    }

    /// Convert a raw pressure code to mmHg.
    pub const fn mmhg(&self, raw: u32) -> i32 {
        let span = (raw as i64 - self.raw_min) * (self.p_max - self.p_min);
        (span / (self.raw_max - self.raw_min) + self.p_min) as i32
    }
}

impl Default for PressureConverter {
    fn default() -> Self {
        Self::new(&SensorConfig::DEFAULT)
    }
}
