//! Oscillometric vitals estimation from a completed deflation series.
//!
//! Single pass over the first differences of the cuff pressure:
//!
//! - a **beat** is a local maximum: the last non-zero difference was a
//!   rise and the current one is a fall. The first beat fixes the
//!   systolic pressure; the first/last beat indices span the heart rate.
//! - **MAP** is the pressure at the end of the largest cumulative rise
//!   (the biggest oscillation).
//! - **diastolic** is derived from MAP and systolic: `(3·MAP − SYS) / 2`.
//!
//! Samples at or above the analysis ceiling are skipped (their difference
//! counts as zero), which keeps the pump-down transient out of the picture.

use serde::{Deserialize, Serialize};

use crate::config::{MeasurementConfig, SERIES_CAPACITY};
use crate::error::AnalysisError;
use crate::session::SampleSeries;

/// Vitals produced by one successful session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsResult {
    pub heart_rate_bpm: i32,
    pub systolic_mmhg: i32,
    pub diastolic_mmhg: i32,
    /// Mean arterial pressure estimate used to derive the diastolic value.
    pub map_mmhg: i32,
    /// Number of beats detected.
    pub beats: u32,
    /// Sample index of the first detected beat.
    pub first_beat: usize,
    /// Sample index of the last detected beat.
    pub last_beat: usize,
}

/// `(3·MAP − systolic) / 2`, truncating toward zero. Results outside the
/// `i32` range saturate.
pub const fn diastolic_from_map(map_mmhg: i32, systolic_mmhg: i32) -> i32 {
    let d = (3 * map_mmhg as i64 - systolic_mmhg as i64) / 2;
    if d > i32::MAX as i64 {
        i32::MAX
    } else if d < i32::MIN as i64 {
        i32::MIN
    } else {
        d as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OscillometricAnalyzer {
    ceiling_mmhg: i32,
    sample_interval_ms: u32,
    pad_to_capacity: bool,
}

impl OscillometricAnalyzer {
    pub const fn new(config: &MeasurementConfig) -> Self {
        Self {
            ceiling_mmhg: config.analysis_ceiling_mmhg,
            sample_interval_ms: config.sample_interval_ms,
            pad_to_capacity: config.pad_analysis_to_capacity,
        }
    }

    /// Estimate vitals from the samples collected during deflation.
    ///
    /// With `pad_analysis_to_capacity` set, the series is extended to the
    /// full arena with 0 mmHg entries before analysis.
    pub fn analyze(&self, samples: &[i32]) -> Result<VitalsResult, AnalysisError> {
        self.analyze_with(samples.len(), |i| samples.get(i).copied().unwrap_or(0))
    }

    /// Same as [`analyze`](Self::analyze), reading straight from the arena.
    pub fn analyze_series(&self, series: &SampleSeries) -> Result<VitalsResult, AnalysisError> {
        self.analyze_with(series.len(), |i| series.get(i).unwrap_or(0))
    }

    fn analyze_with(
        &self,
        collected: usize,
        at: impl Fn(usize) -> i32,
    ) -> Result<VitalsResult, AnalysisError> {
        let len = if self.pad_to_capacity {
            collected.max(SERIES_CAPACITY)
        } else {
            collected
        };

        let mut rising = false;
        let mut beats: u32 = 0;
        let mut first_beat = 0;
        let mut last_beat = 0;
        let mut systolic = 0;

        let mut rise_total: i32 = 0;
        let mut max_rise = 0;
        let mut map = 0;

        for i in 1..len {
            let current = at(i);
            let previous = at(i - 1);
            let diff = if current >= self.ceiling_mmhg {
                0
            } else {
                current.saturating_sub(previous)
            };

            if rising && diff < 0 {
                if beats == 0 {
                    first_beat = i - 1;
                    systolic = previous;
                }
                beats += 1;
                last_beat = i - 1;
            }
            if diff > 0 {
                rising = true;
            } else if diff < 0 {
                rising = false;
            }

            if diff < 0 {
                if rise_total > max_rise {
                    max_rise = rise_total;
                    map = previous;
                }
                rise_total = 0;
            } else {
                rise_total = rise_total.saturating_add(diff);
            }
        }

        if last_beat == first_beat {
            return Err(AnalysisError::InsufficientBeats { beats });
        }

        let span_ms = (last_beat - first_beat) as i64 * i64::from(self.sample_interval_ms);
        let heart_rate = i64::from(beats) * 60_000 / span_ms;

        Ok(VitalsResult {
            heart_rate_bpm: heart_rate as i32,
            systolic_mmhg: systolic,
            diastolic_mmhg: diastolic_from_map(map, systolic),
            map_mmhg: map,
            beats,
            first_beat,
            last_beat,
        })
    }
}

impl Default for OscillometricAnalyzer {
    fn default() -> Self {
        Self::new(&MeasurementConfig::DEFAULT)
    }
}
