//! Sensor subsystem: the cuff pressure sensor and its transfer function.
//!
//! [`pressure::PressureSensor`] runs the bus handshake, [`frame`] decodes
//! what comes back, and [`transfer::PressureConverter`] turns the raw code
//! into mmHg. The driver is plugged into the application service through
//! [`SensorPort`](crate::app::ports::SensorPort).

pub mod frame;
pub mod pressure;
pub mod transfer;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use frame::StatusFlags;
use pressure::{PressureReading, PressureSensor};

impl<I2C: I2c, D: DelayNs> SensorPort for PressureSensor<I2C, D> {
    fn read_pressure(&mut self) -> Result<PressureReading, SensorError> {
        PressureSensor::read_pressure(self)
    }

    fn last_status(&self) -> Option<StatusFlags> {
        PressureSensor::last_status(self)
    }
}
