//! Text content for the display surface.
//!
//! The core never draws: it hands the [`DisplayPort`](crate::app::ports::DisplayPort)
//! a set of lines keyed by logical slot (1 = top line), and the adapter
//! decides fonts, colours and positions. Blank spacer lines are implied by
//! gaps in the slot numbers.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::analysis::VitalsResult;
use crate::control::deflation::DeflationRate;
use crate::error::{AnalysisError, Error, SensorError};
use crate::sensors::frame::StatusFlags;

/// Longest line any screen produces, in bytes.
pub const LINE_LEN: usize = 32;
/// Highest slot count any screen uses.
pub const MAX_LINES: usize = 20;

/// Display layer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub slot: u8,
    pub text: String<LINE_LEN>,
}

pub type ScreenLines = Vec<Line, MAX_LINES>;

/// Everything the core can ask the display to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    PumpUp {
        pressure_mmhg: Option<i32>,
        target_mmhg: i32,
    },
    Deflate {
        pressure_mmhg: Option<i32>,
        rate: Option<DeflationRate>,
    },
    Debug {
        status: Option<StatusFlags>,
    },
    Timeout {
        countdown_secs: u16,
    },
    Report {
        vitals: VitalsResult,
        countdown_secs: u16,
    },
    Failure {
        error: Error,
        countdown_secs: u16,
    },
}

impl Screen {
    pub fn render(&self) -> ScreenLines {
        let mut out = ScreenLines::new();
        match *self {
            Self::PumpUp {
                pressure_mmhg,
                target_mmhg,
            } => {
                line(&mut out, 1, format_args!("Current pressure:"));
                pressure_line(&mut out, 2, pressure_mmhg);
                line(&mut out, 4, format_args!("Keep pumping until"));
                line(&mut out, 5, format_args!("pressure reaches"));
                line(&mut out, 6, format_args!("{target_mmhg} mmHg"));
                line(&mut out, 8, format_args!("Press the button to"));
                line(&mut out, 9, format_args!("enter Debug Mode"));
            }
            Self::Deflate {
                pressure_mmhg,
                rate,
            } => {
                line(&mut out, 1, format_args!("Current pressure:"));
                pressure_line(&mut out, 2, pressure_mmhg);
                line(&mut out, 4, format_args!("Slightly open valve"));
                line(&mut out, 5, format_args!("to make pressure drop"));
                line(&mut out, 6, format_args!("at 4 mmHg/sec"));
                if let Some(rate) = rate {
                    let (first, second) = rate.message();
                    line(&mut out, 8, format_args!("{first}"));
                    line(&mut out, 9, format_args!("{second}"));
                }
            }
            Self::Debug { status } => render_debug(&mut out, status),
            Self::Timeout { countdown_secs } => {
                line(&mut out, 1, format_args!("Sorry, the deflation"));
                line(&mut out, 2, format_args!("took you too long."));
                line(&mut out, 3, format_args!("Please restart from"));
                line(&mut out, 4, format_args!("the beginning."));
                line(&mut out, 6, format_args!("The program will"));
                line(&mut out, 7, format_args!("restart in"));
                line(&mut out, 8, format_args!("{countdown_secs} seconds."));
            }
            Self::Report {
                vitals,
                countdown_secs,
            } => {
                line(&mut out, 1, format_args!("Heart rate: {} bpm", vitals.heart_rate_bpm));
                line(&mut out, 2, format_args!("Systolic: {} mmHg", vitals.systolic_mmhg));
                line(&mut out, 3, format_args!("Diastolic: {} mmHg", vitals.diastolic_mmhg));
                line(&mut out, 5, format_args!("Program will start"));
                line(&mut out, 6, format_args!("over in {countdown_secs} seconds"));
            }
            Self::Failure {
                error,
                countdown_secs,
            } => {
                line(&mut out, 1, format_args!("Measurement failed:"));
                line(&mut out, 2, format_args!("{}", failure_reason(&error)));
                line(&mut out, 4, format_args!("Program will start"));
                line(&mut out, 5, format_args!("over in {countdown_secs} seconds"));
            }
        }
        out
    }
}

/// Short, display-width description of why a session was abandoned.
pub const fn failure_reason(error: &Error) -> &'static str {
    match error {
        Error::Sensor(SensorError::BusyTimeout { .. }) => "sensor stayed busy",
        Error::Sensor(SensorError::Bus(_)) => "sensor bus error",
        Error::Analysis(AnalysisError::InsufficientBeats { .. }) => "too few heartbeats",
        Error::Config(_) => "bad configuration",
    }
}

fn render_debug(out: &mut ScreenLines, status: Option<StatusFlags>) {
    line(out, 1, format_args!("DEBUG MODE"));
    match status {
        None => line(out, 3, format_args!("No sensor frame yet.")),
        Some(s) => {
            line(out, 3, format_args!("The sensor is"));
            line(out, 4, format_args!("{}", if s.is_powered() { "powered." } else { "not powered." }));
            line(out, 6, format_args!("Internal math"));
            line(out, 7, format_args!("saturation has"));
            line(
                out,
                8,
                format_args!("{}", if s.math_saturated() { "occurred." } else { "not occurred." }),
            );
            line(out, 10, format_args!("The memory"));
            line(out, 11, format_args!("integrity test"));
            line(
                out,
                12,
                format_args!("{}", if s.integrity_failed() { "failed." } else { "passed." }),
            );
            line(out, 14, format_args!("The device is"));
            if s.is_busy() {
                line(out, 15, format_args!("busy. The data"));
                line(out, 16, format_args!("is not yet available."));
            } else {
                line(out, 15, format_args!("not busy. The data"));
                line(out, 16, format_args!("is available."));
            }
        }
    }
    line(out, 18, format_args!("Press the button"));
    line(out, 19, format_args!("to exit"));
}

fn pressure_line(out: &mut ScreenLines, slot: u8, mmhg: Option<i32>) {
    match mmhg {
        Some(p) => line(out, slot, format_args!("{p} mmHg")),
        None => line(out, slot, format_args!("-- mmHg")),
    }
}

/// Append one formatted line. Text past [`LINE_LEN`] and lines past
/// [`MAX_LINES`] are dropped.
fn line(out: &mut ScreenLines, slot: u8, args: core::fmt::Arguments<'_>) {
    let mut text = String::new();
    let _ = text.write_fmt(args);
    let _ = out.push(Line { slot, text });
}
