//! Application core: pure domain logic, zero I/O.
//!
//! This module drives the measurement cycle: sampling cadence, FSM
//! orchestration, rendering of screen content, and event publication.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
