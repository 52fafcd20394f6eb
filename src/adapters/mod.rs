//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements   | Connects to        |
//! |----------------|--------------|--------------------|
//! | `log_sink`     | EventSink    | Serial log output  |
//! | `log_display`  | DisplayPort  | Serial log output  |
//!
//! The pressure sensor implements `SensorPort` directly (see
//! [`crate::sensors`]) and the mode button implements `ModeInput`
//! (see [`crate::drivers::mode_button`]).

pub mod log_display;
pub mod log_sink;
