//! Debug-mode toggle shared between the button ISR and the main loop.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up. The GPIO fires on the falling
//! edge and the ISR flips the flag; the main loop only reads it, once per
//! sample. Neither side ever blocks.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::app::ports::ModeInput;

/// Lock-free "debug requested" flag.
pub struct ModeSignal {
    debug: AtomicBool,
}

impl ModeSignal {
    pub const fn new() -> Self {
        Self {
            debug: AtomicBool::new(false),
        }
    }

    /// ISR handler: flip debug mode on or off.
    /// Safe to call from interrupt context.
    pub fn toggle_from_isr(&self) {
        self.debug.fetch_xor(true, Ordering::AcqRel);
    }

    pub fn debug_requested(&self) -> bool {
        self.debug.load(Ordering::Acquire)
    }

    pub fn set(&self, on: bool) {
        self.debug.store(on, Ordering::Release);
    }
}

impl Default for ModeSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeInput for &ModeSignal {
    fn debug_requested(&mut self) -> bool {
        ModeSignal::debug_requested(*self)
    }
}
