//! CuffCore Firmware: Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  PressureSensor    LogDisplay     LogEventSink   ButtonMode  │
//! │  (SensorPort)      (DisplayPort)  (EventSink)    (ModeInput) │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │          MeasurementService (pure logic)               │  │
//! │  │  FSM · session · deflation rate · analysis             │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{Gpio0, Input, InterruptType, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::prelude::*;
use log::{info, warn};

use cuffcore::adapters::log_display::LogDisplay;
use cuffcore::adapters::log_sink::LogEventSink;
use cuffcore::app::ports::ModeInput;
use cuffcore::app::service::MeasurementService;
use cuffcore::config::SystemConfig;
use cuffcore::drivers::mode_button::ModeSignal;
use cuffcore::fsm::context::CycleOutcome;
use cuffcore::sensors::pressure::PressureSensor;

/// Written by the button ISR, read once per sample.
static MODE: ModeSignal = ModeSignal::new();

/// Button pin plus the shared flag. esp-idf disarms a GPIO interrupt
/// after it fires, so every poll re-arms it.
struct ButtonMode<'d> {
    pin: PinDriver<'d, Gpio0, Input>,
}

impl ModeInput for ButtonMode<'_> {
    fn debug_requested(&mut self) -> bool {
        if let Err(e) = self.pin.enable_interrupt() {
            warn!("button interrupt re-arm failed: {e}");
        }
        MODE.debug_requested()
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  CuffCore v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    config.validate()?;

    // ── 2. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8, // SDA
        peripherals.pins.gpio9, // SCL
        &I2cConfig::new().baudrate(100.kHz().into()),
    )?;
    let mut sensor = PressureSensor::new(i2c, FreeRtos, config.sensor);

    let mut button = PinDriver::input(peripherals.pins.gpio0)?;
    button.set_pull(Pull::Up)?;
    button.set_interrupt_type(InterruptType::NegEdge)?;
    // SAFETY: the callback only touches a lock-free atomic.
    unsafe {
        button.subscribe(|| MODE.toggle_from_isr())?;
    }
    button.enable_interrupt()?;
    let mut mode = ButtonMode { pin: button };

    // ── 3. Measurement loop ───────────────────────────────────
    let mut display = LogDisplay::new();
    let mut sink = LogEventSink::new();
    let mut delay = FreeRtos;
    let mut service = MeasurementService::new(config.measurement);
    service.start(&mut display, &mut sink);

    loop {
        match service.run_cycle(&mut sensor, &mut display, &mut mode, &mut delay, &mut sink) {
            CycleOutcome::Completed(v) => info!(
                "cycle {}: HR {} bpm, {}/{} mmHg",
                service.cycles(),
                v.heart_rate_bpm,
                v.systolic_mmhg,
                v.diastolic_mmhg
            ),
            CycleOutcome::SessionTimeout { samples } => {
                warn!("cycle {}: timed out after {samples} samples", service.cycles());
            }
            CycleOutcome::Failed(e) => warn!("cycle {}: {e}", service.cycles()),
        }
    }
}
