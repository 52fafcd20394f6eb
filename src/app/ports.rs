//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MeasurementService (domain)
//! ```
//!
//! Driven adapters (pressure sensor, display, mode button, event sinks)
//! implement these traits. The
//! [`MeasurementService`](super::service::MeasurementService) consumes them
//! via generics, so the domain core never touches hardware directly.
//! Waiting goes through [`embedded_hal::delay::DelayNs`] rather than a port
//! of its own.

use crate::display::{Layer, ScreenLines};
use crate::error::SensorError;
use crate::sensors::frame::StatusFlags;
use crate::sensors::pressure::PressureReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one blocking cuff-pressure reading per call.
pub trait SensorPort {
    /// Run one full command/poll/read exchange and convert the result.
    fn read_pressure(&mut self) -> Result<PressureReading, SensorError>;

    /// Status byte of the most recent frame, for the debug screen.
    fn last_status(&self) -> Option<StatusFlags>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → screen)
// ───────────────────────────────────────────────────────────────

/// Receives text content only. Fonts, colours and pixel positions are
/// the adapter's business; `slot` is a logical line number.
pub trait DisplayPort {
    /// Replace the content of `layer` with `lines`.
    fn show(&mut self, layer: Layer, lines: &ScreenLines);
}

// ───────────────────────────────────────────────────────────────
// Mode input (driven adapter: button → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking poll of the debug-mode toggle.
pub trait ModeInput {
    fn debug_requested(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
