//! CuffCore measurement library.
//!
//! Oscillometric blood-pressure measurement: pressure-sensor protocol,
//! the pump/deflate/analyse state machine, deflation-rate feedback and
//! vitals estimation. Everything here is hardware-agnostic; the firmware
//! binary wires real peripherals to the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod analysis;
pub mod app;
pub mod config;
pub mod control;
pub mod display;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod sensors;
pub mod session;
