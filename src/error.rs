//! Unified error types for the measurement core.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! application service handles sensor and analysis failures the same way:
//! show a message, discard the session, restart the cycle. All variants
//! are `Copy` so they can ride along in events and outcomes without
//! allocation.
//!
//! A deflation that overruns the sample buffer is not an error; it is the
//! `SessionTimeout` outcome of a cycle (see [`crate::app::service`]).

use core::fmt;

use embedded_hal::i2c::ErrorKind;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The pressure sensor could not be read.
    Sensor(SensorError),
    /// The collected series did not yield vitals.
    Analysis(AnalysisError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Analysis(e) => write!(f, "analysis: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// An I2C transaction failed.
    Bus(ErrorKind),
    /// The busy flag was still set after the bounded number of re-polls.
    BusyTimeout { polls: u32 },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(kind) => write!(f, "bus error: {kind}"),
            Self::BusyTimeout { polls } => {
                write!(f, "busy flag stuck after {polls} polls")
            }
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    /// Fewer than two heartbeats were detected; the beat-to-beat span is
    /// zero and no rate can be computed.
    InsufficientBeats { beats: u32 },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientBeats { beats } => {
                write!(f, "insufficient heartbeats ({beats} detected)")
            }
        }
    }
}

impl From<AnalysisError> for Error {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

impl core::error::Error for Error {}
impl core::error::Error for SensorError {}
impl core::error::Error for AnalysisError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
