//! Outbound application events.
//!
//! The [`MeasurementService`](super::service::MeasurementService) emits
//! these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::analysis::VitalsResult;
use crate::control::deflation::DeflationRate;
use crate::error::Error;
use crate::fsm::Phase;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the initial phase).
    Started(Phase),

    /// The FSM moved between phases.
    PhaseChanged { from: Phase, to: Phase },

    /// A deflation window closed and its rate was classified.
    RateClassified { rate: DeflationRate, drop_mmhg: i32 },

    /// Analysis produced a new set of vitals.
    VitalsReady(VitalsResult),

    /// The series filled before deflation finished.
    SessionTimedOut { samples: usize },

    /// The session was abandoned.
    MeasurementFailed(Error),
}
