//! Input drivers.

pub mod mode_button;
