//! Concrete phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  PUMP_UP ──[p ≥ target]──▶ DEFLATE ──[series full]──▶ TIMEOUT_RECOVERY
//!    ▲                          │                              │
//!    │                     [p ≤ floor]                   [countdown 0]
//!    │                          ▼                              │
//!    │                      ANALYSIS                           │
//!    │                          │                              │
//!    │                          ▼                              │
//!    ├────[countdown 0]────── REPORT                           │
//!    └─────────────────────────────────────────────────────────┘
//!
//!  PUMP_UP / DEFLATE ──[sensor error]──▶ REPORT (forced by the service)
//! ```

use super::context::{CycleOutcome, FsmContext};
use super::{Phase, StateDescriptor};
use crate::app::events::AppEvent;
use crate::config::RESTART_COUNTDOWN_SECS;
use log::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Phase::COUNT] {
    [
        // Index 0 PumpUp
        StateDescriptor {
            name: "PumpUp",
            on_enter: Some(pump_up_enter),
            on_exit: None,
            on_update: pump_up_update,
        },
        // Index 1 Deflate
        StateDescriptor {
            name: "Deflate",
            on_enter: Some(deflate_enter),
            on_exit: None,
            on_update: deflate_update,
        },
        // Index 2 TimeoutRecovery
        StateDescriptor {
            name: "TimeoutRecovery",
            on_enter: Some(timeout_enter),
            on_exit: None,
            on_update: countdown_update,
        },
        // Index 3 Analysis
        StateDescriptor {
            name: "Analysis",
            on_enter: Some(analysis_enter),
            on_exit: None,
            on_update: analysis_update,
        },
        // Index 4 Report
        StateDescriptor {
            name: "Report",
            on_enter: Some(report_enter),
            on_exit: None,
            on_update: countdown_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  PUMP_UP user inflates the cuff
// ═══════════════════════════════════════════════════════════════════════════

fn pump_up_enter(ctx: &mut FsmContext) {
    ctx.session.discard();
    info!(
        "PUMP_UP: waiting for cuff pressure ≥ {} mmHg",
        ctx.config.inflate_target_mmhg
    );
}

fn pump_up_update(ctx: &mut FsmContext) -> Option<Phase> {
    let reading = ctx.take_reading()?;
    if reading.mmhg >= ctx.config.inflate_target_mmhg {
        return Some(Phase::Deflate);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  DEFLATE collect the series while the user bleeds the valve
// ═══════════════════════════════════════════════════════════════════════════

fn deflate_enter(ctx: &mut FsmContext) {
    ctx.session.discard();
    info!(
        "DEFLATE: sampling until pressure ≤ {} mmHg",
        ctx.config.deflate_floor_mmhg
    );
}

fn deflate_update(ctx: &mut FsmContext) -> Option<Phase> {
    let reading = ctx.take_reading()?;

    let Ok(sample) = ctx.session.series.push(reading.mmhg) else {
        return Some(Phase::TimeoutRecovery);
    };
    debug!("sample #{}: {} mmHg", sample.index, sample.mmhg);

    if let Some((prev, curr)) = ctx
        .session
        .series
        .window_boundary(usize::from(ctx.config.window_len))
    {
        let rate = ctx.monitor.classify(prev, curr);
        ctx.session.last_rate = Some(rate);
        ctx.emit(AppEvent::RateClassified {
            rate,
            drop_mmhg: prev - curr,
        });
    }

    // A full series ends the session even if this sample reached the floor.
    if ctx.session.series.is_full() {
        return Some(Phase::TimeoutRecovery);
    }

    if sample.mmhg <= ctx.config.deflate_floor_mmhg {
        return Some(Phase::Analysis);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  TIMEOUT_RECOVERY deflation took too long
// ═══════════════════════════════════════════════════════════════════════════

fn timeout_enter(ctx: &mut FsmContext) {
    let samples = ctx.session.series.len();
    warn!("TIMEOUT: series full after {samples} samples, discarding session");
    ctx.session.discard();
    ctx.outcome = Some(CycleOutcome::SessionTimeout { samples });
    ctx.emit(AppEvent::SessionTimedOut { samples });
    ctx.countdown_secs = RESTART_COUNTDOWN_SECS;
}

/// One countdown second per tick. Shared by the two restart phases.
fn countdown_update(ctx: &mut FsmContext) -> Option<Phase> {
    ctx.countdown_secs = ctx.countdown_secs.saturating_sub(1);
    if ctx.countdown_secs == 0 {
        return Some(Phase::PumpUp);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ANALYSIS one pass over the completed series
// ═══════════════════════════════════════════════════════════════════════════

fn analysis_enter(ctx: &mut FsmContext) {
    match ctx.analyzer.analyze_series(&ctx.session.series) {
        Ok(vitals) => {
            info!(
                "ANALYSIS: HR {} bpm, SYS {} mmHg, DIA {} mmHg ({} beats)",
                vitals.heart_rate_bpm, vitals.systolic_mmhg, vitals.diastolic_mmhg, vitals.beats
            );
            ctx.session.discard();
            ctx.vitals = Some(vitals);
            ctx.outcome = Some(CycleOutcome::Completed(vitals));
            ctx.emit(AppEvent::VitalsReady(vitals));
        }
        Err(e) => {
            warn!("ANALYSIS: {e}");
            ctx.fail(e.into());
        }
    }
}

fn analysis_update(_ctx: &mut FsmContext) -> Option<Phase> {
    Some(Phase::Report)
}

// ═══════════════════════════════════════════════════════════════════════════
//  REPORT show the result, then count down to the next cycle
// ═══════════════════════════════════════════════════════════════════════════

fn report_enter(ctx: &mut FsmContext) {
    ctx.countdown_secs = RESTART_COUNTDOWN_SECS;
    info!("REPORT: restarting in {} s", ctx.countdown_secs);
}
