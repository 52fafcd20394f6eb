//! Digital cuff-pressure sensor driver (24-bit, I2C, 0–300 mmHg).
//!
//! ## Read handshake
//!
//! The device drops back to standby after every status read, so the
//! "enter operating mode" command has to be re-sent before each poll:
//!
//! ```text
//!  CMD ─ 10ms ─ STATUS ──busy?──▶ CMD ─ 10ms ─ STATUS ──busy?── ...
//!                                                  │ ready
//!                                                  ▼
//!                                 CMD ─ 10ms ─ FRAME (4 bytes)
//! ```
//!
//! The busy loop is bounded by `SensorConfig::max_busy_polls`.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, warn};

use super::frame::{RawFrame, StatusFlags};
use super::transfer::PressureConverter;
use crate::config::{COMMAND_DELAY_MS, SensorConfig};
use crate::error::SensorError;

/// One converted reading together with the frame it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureReading {
    pub frame: RawFrame,
    pub mmhg: i32,
}

pub struct PressureSensor<I2C, D> {
    i2c: I2C,
    delay: D,
    config: SensorConfig,
    converter: PressureConverter,
    last_status: Option<StatusFlags>,
}

impl<I2C: I2c, D: DelayNs> PressureSensor<I2C, D> {
    pub fn new(i2c: I2C, delay: D, config: SensorConfig) -> Self {
        Self {
            i2c,
            delay,
            converter: PressureConverter::new(&config),
            config,
            last_status: None,
        }
    }

    /// Status flags from the most recent status or frame read.
    pub fn last_status(&self) -> Option<StatusFlags> {
        self.last_status
    }

    /// Give the bus and delay back (used by tests to inspect the mock bus).
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Run the full handshake and return the current cuff pressure.
    pub fn read_pressure(&mut self) -> Result<PressureReading, SensorError> {
        self.enter_operating_mode()?;
        self.wait_while_busy()?;
        // The status read put the device back in standby.
        self.enter_operating_mode()?;

        let mut buf = [0u8; RawFrame::LEN];
        self.i2c
            .read(self.config.address, &mut buf)
            .map_err(|e| SensorError::Bus(e.kind()))?;

        let frame = RawFrame::from_bytes(buf);
        self.last_status = Some(frame.status);
        if frame.status.integrity_failed() || frame.status.math_saturated() {
            warn!(
                "pressure sensor status 0b{:08b}: integrity={} saturation={}",
                frame.status.bits(),
                frame.status.integrity_failed(),
                frame.status.math_saturated()
            );
        }

        let mmhg = self.converter.mmhg(frame.pressure_code);
        debug!("pressure raw={} -> {} mmHg", frame.pressure_code, mmhg);
        Ok(PressureReading { frame, mmhg })
    }

    fn enter_operating_mode(&mut self) -> Result<(), SensorError> {
        self.i2c
            .write(self.config.address, &self.config.command)
            .map_err(|e| SensorError::Bus(e.kind()))?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        Ok(())
    }

    fn read_status(&mut self) -> Result<StatusFlags, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .read(self.config.address, &mut buf)
            .map_err(|e| SensorError::Bus(e.kind()))?;
        let status = StatusFlags(buf[0]);
        self.last_status = Some(status);
        Ok(status)
    }

    fn wait_while_busy(&mut self) -> Result<(), SensorError> {
        let mut status = self.read_status()?;
        let mut polls = 0;
        while status.is_busy() {
            if polls >= self.config.max_busy_polls {
                warn!("pressure sensor busy after {} polls, giving up", polls);
                return Err(SensorError::BusyTimeout { polls });
            }
            self.enter_operating_mode()?;
            status = self.read_status()?;
            polls += 1;
        }
        Ok(())
    }
}
