//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that phase handlers read from and
//! write to: the latest sensor reading, the session being collected, the
//! restart countdown, and the outcome of the cycle in progress. Handlers
//! never touch hardware; anything the outside world should hear about is
//! queued in [`FsmContext::events`] and drained by the service.

use heapless::Vec;
use log::warn;

use crate::analysis::{OscillometricAnalyzer, VitalsResult};
use crate::app::events::AppEvent;
use crate::config::MeasurementConfig;
use crate::control::deflation::DeflationRateMonitor;
use crate::error::Error;
use crate::sensors::pressure::PressureReading;
use crate::session::MeasurementSession;

/// Maximum events a single tick may queue.
pub const EVENT_QUEUE_LEN: usize = 4;

/// How a pump/deflate cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Deflation reached the floor and vitals were computed.
    Completed(VitalsResult),
    /// The series filled before the floor was reached.
    SessionTimeout { samples: usize },
    /// The sensor failed or the series held too few beats.
    Failed(Error),
}

/// The shared context passed to every phase handler function.
pub struct FsmContext {
    // -- Sensor data --
    /// Reading taken for this tick. Consumed by the handler.
    pub reading: Option<PressureReading>,
    /// Most recent reading, kept for display.
    pub last_reading: Option<PressureReading>,

    // -- Session --
    pub session: MeasurementSession,
    /// Seconds left before the next cycle starts.
    pub countdown_secs: u16,
    /// Set once the current cycle's result is known.
    pub outcome: Option<CycleOutcome>,
    /// Last successfully computed vitals. Survives failed and timed-out cycles.
    pub vitals: Option<VitalsResult>,

    // -- Outbox --
    pub events: Vec<AppEvent, EVENT_QUEUE_LEN>,

    // -- Configuration --
    pub config: MeasurementConfig,
    pub monitor: DeflationRateMonitor,
    pub analyzer: OscillometricAnalyzer,
}

impl FsmContext {
    pub fn new(config: MeasurementConfig) -> Self {
        Self {
            reading: None,
            last_reading: None,
            session: MeasurementSession::new(),
            countdown_secs: 0,
            outcome: None,
            vitals: None,
            events: Vec::new(),
            monitor: DeflationRateMonitor::new(&config),
            analyzer: OscillometricAnalyzer::new(&config),
            config,
        }
    }

    /// Take this tick's reading, remembering it for display.
    pub fn take_reading(&mut self) -> Option<PressureReading> {
        let reading = self.reading.take()?;
        self.last_reading = Some(reading);
        Some(reading)
    }

    /// Queue an event for the service to publish after the tick.
    pub fn emit(&mut self, event: AppEvent) {
        if let Err(dropped) = self.events.push(event) {
            warn!("event queue full, dropping {dropped:?}");
        }
    }

    /// Abandon the session with `error` as the cycle outcome.
    pub fn fail(&mut self, error: Error) {
        self.session.discard();
        self.outcome = Some(CycleOutcome::Failed(error));
        self.emit(AppEvent::MeasurementFailed(error));
    }
}
