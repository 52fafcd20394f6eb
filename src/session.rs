//! Per-cycle measurement session and its fixed-capacity sample arena.
//!
//! A session lives from the start of pump-up until the cycle either
//! completes (after analysis) or times out. The [`SampleSeries`] never
//! allocates: it is a `heapless::Vec` sized by [`SERIES_CAPACITY`], and
//! running out of room is exactly the session-timeout condition.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::SERIES_CAPACITY;
use crate::control::deflation::DeflationRate;

/// One stored deflation sample. Never mutated after it is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressureSample {
    /// Position in the session, starting at 0.
    pub index: u16,
    pub mmhg: i32,
}

/// Returned by [`SampleSeries::push`] when the arena is already full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesFull;

/// Ordered deflation samples, logically split into windows of
/// `window_len` samples for rate classification.
#[derive(Debug, Clone, Default)]
pub struct SampleSeries {
    samples: Vec<PressureSample, SERIES_CAPACITY>,
}

impl SampleSeries {
    pub const fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Append a reading, assigning it the next index.
    pub fn push(&mut self, mmhg: i32) -> Result<PressureSample, SeriesFull> {
        let sample = PressureSample {
            index: self.samples.len() as u16,
            mmhg,
        };
        self.samples.push(sample).map_err(|_| SeriesFull)?;
        Ok(sample)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    pub fn samples(&self) -> &[PressureSample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<i32> {
        self.samples.get(index).map(|s| s.mmhg)
    }

    pub fn last(&self) -> Option<PressureSample> {
        self.samples.last().copied()
    }

    /// If the most recent sample opened a new window and a previous window
    /// exists, return `(previous window's first, current window's first)`.
    pub fn window_boundary(&self, window_len: usize) -> Option<(i32, i32)> {
        let idx = self.samples.len().checked_sub(1)?;
        if window_len == 0 || idx < window_len || idx % window_len != 0 {
            return None;
        }
        Some((self.samples[idx - window_len].mmhg, self.samples[idx].mmhg))
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Everything one pump/deflate cycle accumulates.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSession {
    pub series: SampleSeries,
    /// Most recent deflation-rate classification, if any window closed yet.
    pub last_rate: Option<DeflationRate>,
}

impl MeasurementSession {
    pub const fn new() -> Self {
        Self {
            series: SampleSeries::new(),
            last_rate: None,
        }
    }

    /// Drop everything collected so far.
    pub fn discard(&mut self) {
        self.series.clear();
        self.last_rate = None;
    }
}
