//! Function-pointer finite state machine engine for the measurement cycle.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌─────────────────┬──────────┬─────────┬──────────────────┐ │
//! │  │ Phase           │ on_enter │ on_exit │ on_update        │ │
//! │  ├─────────────────┼──────────┼─────────┼──────────────────┤ │
//! │  │ PumpUp          │ fn(ctx)  │  None   │ fn(ctx)->Option<>│ │
//! │  │ Deflate         │ fn(ctx)  │  None   │ fn(ctx)->Option<>│ │
//! │  │ TimeoutRecovery │ fn(ctx)  │  None   │ fn(ctx)->Option<>│ │
//! │  │ Analysis        │ fn(ctx)  │  None   │ fn(ctx)->Option<>│ │
//! │  │ Report          │ fn(ctx)  │  None   │ fn(ctx)->Option<>│ │
//! │  └─────────────────┴──────────┴─────────┴──────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** phase.
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! phase, then `on_enter` for the next, and updates the current pointer.
//! How long a tick lasts is decided by the caller from [`Phase::cadence`]:
//! sampling phases wait and read the sensor, countdown phases wait one
//! second, and `Analysis` runs straight through.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Enumeration of all measurement phases.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    PumpUp = 0,
    Deflate = 1,
    TimeoutRecovery = 2,
    Analysis = 3,
    Report = 4,
}

/// What the driver loop does before running a phase's update handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Wait the fixed sample interval, then read the sensor.
    Sample,
    /// Wait one second of the restart countdown.
    Countdown,
    /// No wait.
    Immediate,
}

impl Phase {
    /// Total number of phases: used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `u8` index back to `Phase`.  Panics on out-of-range in
    /// debug builds; returns `PumpUp` in release (restart the cycle).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::PumpUp,
            1 => Self::Deflate,
            2 => Self::TimeoutRecovery,
            3 => Self::Analysis,
            4 => Self::Report,
            _ => {
                debug_assert!(false, "invalid phase index: {idx}");
                Self::PumpUp
            }
        }
    }

    pub const fn cadence(self) -> Cadence {
        match self {
            Self::PumpUp | Self::Deflate => Cadence::Sample,
            Self::TimeoutRecovery | Self::Report => Cadence::Countdown,
            Self::Analysis => Cadence::Immediate,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Phase>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single phase.
pub struct StateDescriptor {
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `Phase as usize`.
    table: [StateDescriptor; Phase::COUNT],
    /// Index of the currently active phase.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting phase.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in phase: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (used by the service to abandon a
    /// session when the sensor fails).
    pub fn force_transition(&mut self, next: Phase, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_phase(&self) -> Phase {
        Phase::from_index(self.current)
    }

    fn transition(&mut self, next_id: Phase, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
