//! Status byte and data frame returned by the pressure sensor.
//!
//! ```text
//!   byte 0        byte 1     byte 2     byte 3
//! ┌──────────┐ ┌──────────┬──────────┬──────────┐
//! │  status  │ │ P[23:16] │ P[15:8]  │  P[7:0]  │
//! └──────────┘ └──────────┴──────────┴──────────┘
//!   bit0 math saturation
//!   bit2 memory integrity failure
//!   bit5 busy
//!   bit6 powered
//! ```

use serde::{Deserialize, Serialize};

/// Decoded view over the sensor status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusFlags(pub u8);

impl StatusFlags {
    pub const MATH_SATURATION: u8 = 1 << 0;
    pub const INTEGRITY_FAILED: u8 = 1 << 2;
    pub const BUSY: u8 = 1 << 5;
    pub const POWERED: u8 = 1 << 6;

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Internal math saturation has occurred.
    pub const fn math_saturated(self) -> bool {
        self.0 & Self::MATH_SATURATION != 0
    }

    /// The checksum-based memory integrity test failed.
    pub const fn integrity_failed(self) -> bool {
        self.0 & Self::INTEGRITY_FAILED != 0
    }

    /// Data for the last command is not yet available.
    pub const fn is_busy(self) -> bool {
        self.0 & Self::BUSY != 0
    }

    pub const fn is_powered(self) -> bool {
        self.0 & Self::POWERED != 0
    }
}

/// One status + 24-bit pressure frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    pub status: StatusFlags,
    /// Unsigned 24-bit pressure code (upper byte always zero).
    pub pressure_code: u32,
}

impl RawFrame {
    /// Wire length of a frame.
    pub const LEN: usize = 4;

    /// Decode a frame; pressure bytes are big-endian.
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self {
            status: StatusFlags(bytes[0]),
            pressure_code: u32::from_be_bytes([0, bytes[1], bytes[2], bytes[3]]),
        }
    }
}
