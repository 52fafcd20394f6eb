//! System configuration parameters
//!
//! Device constants (bus address, command bytes, transfer function) and
//! measurement tunables (thresholds, cadence, countdowns) for the
//! blood-pressure core. Defaults are `const` so they can size and seed
//! the firmware at compile time.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of samples the deflation phase can hold (90 s at 10 Hz).
/// Filling the series is the session-timeout condition.
pub const SERIES_CAPACITY: usize = 900;

/// Minimum gap after every command sent to the pressure sensor. Hardware
/// timing contract, so not part of [`SensorConfig`].
pub const COMMAND_DELAY_MS: u32 = 10;

/// Countdown between a report or timeout and the next pump-up.
pub const RESTART_COUNTDOWN_SECS: u16 = 30;

/// Pressure sensor wiring and transfer function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// 7-bit I2C device address.
    pub address: u8,
    /// "Enter operating mode" command, resent before every poll.
    pub command: [u8; 3],
    /// Busy re-polls allowed before giving up with `BusyTimeout`.
    pub max_busy_polls: u32,
    /// Raw output at `p_min_mmhg` (2.5 % of 2^24, transfer function B).
    pub raw_min: u32,
    /// Raw output at `p_max_mmhg` (22.5 % of 2^24, transfer function B).
    pub raw_max: u32,
    pub p_min_mmhg: i32,
    pub p_max_mmhg: i32,
}

impl SensorConfig {
    pub const DEFAULT: Self = Self {
        address: 0b001_1000,
        command: [0xAA, 0x00, 0x00],
        max_busy_polls: 50,
        raw_min: 419_430,
        raw_max: 3_774_873,
        p_min_mmhg: 0,
        p_max_mmhg: 300,
    };

    /// 8-bit write address (address << 1, R/W bit clear).
    pub const fn write_address(&self) -> u8 {
        self.address << 1
    }

    /// 8-bit read address (address << 1, R/W bit set).
    pub const fn read_address(&self) -> u8 {
        (self.address << 1) | 1
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Measurement-cycle tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementConfig {
    // --- Thresholds ---
    /// Cuff pressure that ends pump-up (mmHg).
    pub inflate_target_mmhg: i32,
    /// Deflation ends once pressure falls to this value or below (mmHg).
    pub deflate_floor_mmhg: i32,
    /// Samples at or above this pressure are ignored by the analyzer (mmHg).
    pub analysis_ceiling_mmhg: i32,

    // --- Deflation rate ---
    /// Drop per window above which deflation is too fast (mmHg).
    pub too_fast_drop_mmhg: i32,
    /// Positive drop per window below which deflation is too slow (mmHg).
    pub too_slow_drop_mmhg: i32,
    /// Samples per rate-classification window (~1 s).
    pub window_len: u16,

    // --- Timing ---
    /// Fixed wait before every sensor read (milliseconds).
    pub sample_wait_ms: u32,
    /// Effective inter-sample interval assumed by the heart-rate formula.
    /// The fixed wait plus at least two command delays inside the driver.
    pub sample_interval_ms: u32,

    // --- Analysis ---
    /// Analyse the whole fixed-capacity series, treating unfilled slots as
    /// 0 mmHg, instead of only the samples actually collected.
    pub pad_analysis_to_capacity: bool,
}

impl MeasurementConfig {
    pub const DEFAULT: Self = Self {
        inflate_target_mmhg: 150,
        deflate_floor_mmhg: 30,
        analysis_ceiling_mmhg: 150,
        too_fast_drop_mmhg: 6,
        too_slow_drop_mmhg: 4,
        window_len: 10,
        sample_wait_ms: 100,
        sample_interval_ms: 120,
        pad_analysis_to_capacity: false,
    };
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Core system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    pub sensor: SensorConfig,
    pub measurement: MeasurementConfig,
}

impl SystemConfig {
    /// Reject combinations the state machine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.sensor;
        let m = &self.measurement;

        if s.address > 0x7F {
            return Err(Error::Config("sensor address must be 7-bit"));
        }
        if s.raw_min >= s.raw_max {
            return Err(Error::Config("raw_min must be below raw_max"));
        }
        if s.raw_max > 0x00FF_FFFF {
            return Err(Error::Config("raw_max exceeds 24-bit output"));
        }
        if s.p_min_mmhg >= s.p_max_mmhg {
            return Err(Error::Config("p_min must be below p_max"));
        }
        if s.max_busy_polls == 0 {
            return Err(Error::Config("busy poll bound must be non-zero"));
        }
        if m.deflate_floor_mmhg >= m.inflate_target_mmhg {
            return Err(Error::Config("deflate floor must be below inflate target"));
        }
        if m.too_slow_drop_mmhg > m.too_fast_drop_mmhg {
            return Err(Error::Config("too-slow drop must not exceed too-fast drop"));
        }
        if m.window_len == 0 || usize::from(m.window_len) > SERIES_CAPACITY {
            return Err(Error::Config("window length out of range"));
        }
        if m.sample_interval_ms == 0 {
            return Err(Error::Config("sample interval must be non-zero"));
        }
        Ok(())
    }
}
