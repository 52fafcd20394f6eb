//! Application service: the hexagonal core.
//!
//! [`MeasurementService`] owns the FSM and its shared context. It decides
//! how long each tick lasts (from the phase cadence), reads the sensor,
//! renders the screen, and publishes events. All I/O flows through port
//! traits injected at call sites, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ DisplayPort
//!  ModeInput  ──▶ │   MeasurementService     │ ──▶ EventSink
//!  DelayNs    ◀── │   FSM · session · vitals │
//!                 └──────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::analysis::VitalsResult;
use crate::config::MeasurementConfig;
use crate::display::{Layer, Screen, ScreenLines};
use crate::fsm::context::{CycleOutcome, FsmContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Cadence, Fsm, Phase};

use super::events::AppEvent;
use super::ports::{DisplayPort, EventSink, ModeInput, SensorPort};

/// Length of one countdown tick.
const COUNTDOWN_TICK_MS: u32 = 1000;

// ───────────────────────────────────────────────────────────────
// MeasurementService
// ───────────────────────────────────────────────────────────────

pub struct MeasurementService {
    fsm: Fsm,
    ctx: FsmContext,
    sample_wait_ms: u32,
    cycles: u32,
}

impl MeasurementService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: MeasurementConfig) -> Self {
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), Phase::PumpUp);
        Self {
            fsm,
            ctx,
            sample_wait_ms: config.sample_wait_ms,
            cycles: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Clear both layers and enter `PumpUp`.
    pub fn start(&mut self, display: &mut impl DisplayPort, sink: &mut impl EventSink) {
        display.show(Layer::Background, &ScreenLines::new());
        display.show(Layer::Foreground, &ScreenLines::new());
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_phase()));
        info!("MeasurementService started in {:?}", self.fsm.current_phase());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one step: wait per the phase cadence → read sensor → FSM →
    /// render → publish.
    ///
    /// Returns the cycle's outcome on the tick that restarts `PumpUp`.
    pub fn tick(
        &mut self,
        sensor: &mut impl SensorPort,
        display: &mut impl DisplayPort,
        mode: &mut impl ModeInput,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Option<CycleOutcome> {
        let prev_phase = self.fsm.current_phase();

        match prev_phase.cadence() {
            Cadence::Sample => {
                delay.delay_ms(self.sample_wait_ms);
                match sensor.read_pressure() {
                    Ok(reading) => {
                        debug!("read {} mmHg (status 0x{:02x})", reading.mmhg, reading.frame.status.bits());
                        self.ctx.reading = Some(reading);
                        self.fsm.tick(&mut self.ctx);
                    }
                    Err(e) => {
                        warn!("sensor read failed in {prev_phase:?}: {e}");
                        self.ctx.fail(e.into());
                        self.fsm.force_transition(Phase::Report, &mut self.ctx);
                    }
                }
            }
            Cadence::Countdown => {
                delay.delay_ms(COUNTDOWN_TICK_MS);
                self.fsm.tick(&mut self.ctx);
            }
            Cadence::Immediate => self.fsm.tick(&mut self.ctx),
        }

        self.render(&*sensor, display, mode);
        self.publish(prev_phase, sink)
    }

    /// Tick until the machine returns to `PumpUp`.
    pub fn run_cycle(
        &mut self,
        sensor: &mut impl SensorPort,
        display: &mut impl DisplayPort,
        mode: &mut impl ModeInput,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        loop {
            if let Some(outcome) = self.tick(sensor, display, mode, delay, sink) {
                return outcome;
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.fsm.current_phase()
    }

    /// Most recent successful vitals, if any cycle has completed.
    pub fn vitals(&self) -> Option<VitalsResult> {
        self.ctx.vitals
    }

    /// Completed cycles of any outcome.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn context(&self) -> &FsmContext {
        &self.ctx
    }

    // ── Internal ──────────────────────────────────────────────

    fn render(
        &self,
        sensor: &impl SensorPort,
        display: &mut impl DisplayPort,
        mode: &mut impl ModeInput,
    ) {
        let phase = self.fsm.current_phase();
        let screen = if phase.cadence() == Cadence::Sample && mode.debug_requested() {
            Screen::Debug {
                status: sensor.last_status(),
            }
        } else {
            match self.screen_for(phase) {
                Some(screen) => screen,
                None => return,
            }
        };
        let lines = screen.render();
        for line in &lines {
            debug!("LCD {:>2} | {}", line.slot, line.text);
        }
        display.show(Layer::Foreground, &lines);
    }

    fn screen_for(&self, phase: Phase) -> Option<Screen> {
        let pressure_mmhg = self.ctx.last_reading.map(|r| r.mmhg);
        let countdown_secs = self.ctx.countdown_secs;
        match phase {
            Phase::PumpUp => Some(Screen::PumpUp {
                pressure_mmhg,
                target_mmhg: self.ctx.config.inflate_target_mmhg,
            }),
            Phase::Deflate => Some(Screen::Deflate {
                pressure_mmhg,
                rate: self.ctx.session.last_rate,
            }),
            Phase::TimeoutRecovery => Some(Screen::Timeout { countdown_secs }),
            Phase::Analysis => None,
            Phase::Report => match self.ctx.outcome {
                Some(CycleOutcome::Completed(vitals)) => Some(Screen::Report {
                    vitals,
                    countdown_secs,
                }),
                Some(CycleOutcome::Failed(error)) => Some(Screen::Failure {
                    error,
                    countdown_secs,
                }),
                Some(CycleOutcome::SessionTimeout { .. }) | None => None,
            },
        }
    }

    /// Drain the context outbox, announce a phase change, and hand back the
    /// outcome once the machine wraps around to `PumpUp`.
    fn publish(&mut self, prev_phase: Phase, sink: &mut impl EventSink) -> Option<CycleOutcome> {
        for event in &self.ctx.events {
            sink.emit(event);
        }
        self.ctx.events.clear();

        let new_phase = self.fsm.current_phase();
        if new_phase == prev_phase {
            return None;
        }
        sink.emit(&AppEvent::PhaseChanged {
            from: prev_phase,
            to: new_phase,
        });

        if new_phase != Phase::PumpUp {
            return None;
        }
        let outcome = self.ctx.outcome.take()?;
        self.cycles += 1;
        info!("cycle {} finished: {:?}", self.cycles, outcome);
        Some(outcome)
    }
}
