//! Display adapter for boards without a panel: every line set goes to
//! the log.

use log::info;

use crate::app::ports::DisplayPort;
use crate::display::{Layer, ScreenLines};

#[derive(Debug, Default)]
pub struct LogDisplay {
    frames: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line sets shown so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, layer: Layer, lines: &ScreenLines) {
        self.frames = self.frames.wrapping_add(1);
        if lines.is_empty() {
            info!("LCD {layer:?} cleared");
            return;
        }
        for line in lines {
            info!("LCD {layer:?} {:>2} | {}", line.slot, line.text);
        }
    }
}
