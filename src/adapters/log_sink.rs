//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production, the test harness on host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as one line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(phase) => {
                info!("START | initial_phase={phase:?}");
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {from:?} -> {to:?}");
            }
            AppEvent::RateClassified { rate, drop_mmhg } => {
                info!("RATE  | {rate:?} (drop {drop_mmhg} mmHg/window)");
            }
            AppEvent::VitalsReady(v) => {
                info!(
                    "VITALS | HR={}bpm SYS={}mmHg DIA={}mmHg MAP={}mmHg | beats={} span={}..{}",
                    v.heart_rate_bpm,
                    v.systolic_mmhg,
                    v.diastolic_mmhg,
                    v.map_mmhg,
                    v.beats,
                    v.first_beat,
                    v.last_beat,
                );
            }
            AppEvent::SessionTimedOut { samples } => {
                warn!("TIMEOUT | deflation overran after {samples} samples");
            }
            AppEvent::MeasurementFailed(e) => {
                warn!("FAILED | {e}");
            }
        }
    }
}
