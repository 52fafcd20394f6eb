//! Integration tests for the MeasurementService → FSM → display/events
//! pipeline, driven by scripted pressure traces and a virtual clock.

use crate::mock_hw::{
    FixedMode, LogSink, RecordingDisplay, ScriptedSensor, VirtualDelay, good_cycle,
    pump_up_trace,
};

use cuffcore::app::events::AppEvent;
use cuffcore::app::service::MeasurementService;
use cuffcore::config::{MeasurementConfig, SERIES_CAPACITY};
use cuffcore::control::deflation::DeflationRate;
use cuffcore::display::Layer;
use cuffcore::error::{Error, SensorError};
use cuffcore::fsm::Phase;
use cuffcore::fsm::context::CycleOutcome;

struct Rig {
    service: MeasurementService,
    display: RecordingDisplay,
    mode: FixedMode,
    delay: VirtualDelay,
    sink: LogSink,
}

impl Rig {
    fn new() -> Self {
        Self::with_mode(FixedMode::off())
    }

    fn with_mode(mode: FixedMode) -> Self {
        let mut rig = Self {
            service: MeasurementService::new(MeasurementConfig::default()),
            display: RecordingDisplay::new(),
            mode,
            delay: VirtualDelay::new(),
            sink: LogSink::new(),
        };
        rig.service.start(&mut rig.display, &mut rig.sink);
        rig
    }

    fn cycle(&mut self, sensor: &mut ScriptedSensor) -> CycleOutcome {
        self.service.run_cycle(
            sensor,
            &mut self.display,
            &mut self.mode,
            &mut self.delay,
            &mut self.sink,
        )
    }

    fn tick(&mut self, sensor: &mut ScriptedSensor) -> Option<CycleOutcome> {
        self.service.tick(
            sensor,
            &mut self.display,
            &mut self.mode,
            &mut self.delay,
            &mut self.sink,
        )
    }

    fn phase_changes(&self) -> Vec<(Phase, Phase)> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

/// Pump up, then hold a constant pressure that never reaches the floor.
fn stalled_sensor() -> ScriptedSensor {
    ScriptedSensor::new(pump_up_trace(), 100)
}

// ── Completed cycle ───────────────────────────────────────────

#[test]
fn good_deflation_reports_vitals() {
    let mut rig = Rig::new();
    let mut sensor = ScriptedSensor::new(good_cycle(), 0);

    let outcome = rig.cycle(&mut sensor);
    let CycleOutcome::Completed(v) = outcome else {
        panic!("expected vitals, got {outcome:?}");
    };

    assert!(v.beats >= 2);
    assert!((60..=100).contains(&v.heart_rate_bpm), "HR {}", v.heart_rate_bpm);
    assert!(v.systolic_mmhg > v.map_mmhg);
    assert!(v.map_mmhg > v.diastolic_mmhg);
    assert!((70..=125).contains(&v.map_mmhg), "MAP {}", v.map_mmhg);
    assert_eq!(v.diastolic_mmhg, (3 * v.map_mmhg - v.systolic_mmhg) / 2);

    assert_eq!(rig.service.vitals(), Some(v));
    assert_eq!(rig.service.phase(), Phase::PumpUp);
    assert_eq!(rig.service.cycles(), 1);
    assert!(rig.sink.events.contains(&AppEvent::VitalsReady(v)));
}

#[test]
fn good_cycle_walks_every_phase_in_order() {
    let mut rig = Rig::new();
    let mut sensor = ScriptedSensor::new(good_cycle(), 0);
    rig.cycle(&mut sensor);

    assert_eq!(rig.sink.events[0], AppEvent::Started(Phase::PumpUp));
    assert_eq!(
        rig.phase_changes(),
        vec![
            (Phase::PumpUp, Phase::Deflate),
            (Phase::Deflate, Phase::Analysis),
            (Phase::Analysis, Phase::Report),
            (Phase::Report, Phase::PumpUp),
        ]
    );
}

#[test]
fn report_shows_vitals_for_thirty_seconds() {
    let mut rig = Rig::new();
    let mut sensor = ScriptedSensor::new(good_cycle(), 0);
    let CycleOutcome::Completed(v) = rig.cycle(&mut sensor) else {
        panic!("expected vitals");
    };

    assert_eq!(rig.delay.count_of(1000), 30);
    let hr = format!("Heart rate: {} bpm", v.heart_rate_bpm);
    // entry frame plus 29 countdown frames; the 30th second restarts
    assert_eq!(rig.display.count_with(&hr), 30);
    assert_eq!(rig.display.count_with("over in 29 seconds"), 1);
    assert_eq!(rig.display.count_with("over in 1 seconds"), 1);
}

#[test]
fn every_sample_waits_the_fixed_interval() {
    let mut rig = Rig::new();
    let trace = good_cycle();
    let reads = trace.len();
    let mut sensor = ScriptedSensor::new(trace, 0);
    rig.cycle(&mut sensor);

    assert_eq!(sensor.reads, reads);
    assert_eq!(rig.delay.count_of(100), reads);
    assert_eq!(rig.delay.elapsed_ms(), reads as u64 * 100 + 30_000);
}

#[test]
fn rate_feedback_appears_after_first_window() {
    let mut rig = Rig::new();
    let mut sensor = ScriptedSensor::new(good_cycle(), 0);
    rig.cycle(&mut sensor);

    let rates: Vec<DeflationRate> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::RateClassified { rate, .. } => Some(*rate),
            _ => None,
        })
        .collect();
    // 301 deflation samples: windows open at 10, 20, .., 300
    assert_eq!(rates.len(), 30);
    assert!(rig.display.count_with("Deflation is") > 0);
}

#[test]
fn drop_mmhg_matches_window_heads() {
    let mut rig = Rig::new();
    // flat at 140, then a 10 mmHg step at the second window head
    let mut trace = pump_up_trace();
    trace.extend(std::iter::repeat_n(140, 10));
    trace.push(130);
    let mut sensor = ScriptedSensor::new(trace, 130);
    for _ in 0..20 {
        rig.tick(&mut sensor);
    }
    assert!(rig.sink.events.contains(&AppEvent::RateClassified {
        rate: DeflationRate::TooFast,
        drop_mmhg: 10,
    }));
    let last = rig.display.last_foreground().unwrap();
    assert!(last.has("TOO FAST."));
}

// ── Session timeout ───────────────────────────────────────────

#[test]
fn stalled_deflation_times_out_at_capacity() {
    let mut rig = Rig::new();
    let mut sensor = stalled_sensor();

    let outcome = rig.cycle(&mut sensor);
    assert_eq!(
        outcome,
        CycleOutcome::SessionTimeout {
            samples: SERIES_CAPACITY
        }
    );
    assert_eq!(sensor.reads, pump_up_trace().len() + SERIES_CAPACITY);
    assert_eq!(rig.service.vitals(), None);
    assert!(rig.display.count_with("Sorry, the deflation") > 0);
    assert!(
        rig.sink
            .events
            .contains(&AppEvent::SessionTimedOut { samples: SERIES_CAPACITY })
    );
    assert!(rig.service.context().session.series.is_empty());
}

#[test]
fn timeout_recovery_waits_thirty_seconds() {
    let mut rig = Rig::new();
    let mut sensor = stalled_sensor();
    rig.cycle(&mut sensor);

    assert_eq!(rig.delay.count_of(1000), 30);
    assert_eq!(rig.display.count_with("29 seconds."), 1);
    assert_eq!(
        rig.phase_changes().last(),
        Some(&(Phase::TimeoutRecovery, Phase::PumpUp))
    );
}

#[test]
fn timeout_keeps_previous_vitals() {
    let mut rig = Rig::new();
    let mut first = ScriptedSensor::new(good_cycle(), 0);
    let CycleOutcome::Completed(v) = rig.cycle(&mut first) else {
        panic!("expected vitals");
    };

    let mut second = stalled_sensor();
    let outcome = rig.cycle(&mut second);
    assert!(matches!(outcome, CycleOutcome::SessionTimeout { .. }));
    assert_eq!(rig.service.vitals(), Some(v));
    assert_eq!(rig.service.cycles(), 2);
}

// ── Failures ──────────────────────────────────────────────────

#[test]
fn sensor_failure_abandons_session_and_restarts() {
    let mut rig = Rig::new();
    // fail on the 21st deflation read
    let fail_at = pump_up_trace().len() + 20;
    let mut sensor = ScriptedSensor::new(good_cycle(), 0).failing_at(fail_at);

    let outcome = rig.cycle(&mut sensor);
    let err = Error::Sensor(SensorError::BusyTimeout { polls: 50 });
    assert_eq!(outcome, CycleOutcome::Failed(err));
    assert_eq!(sensor.reads, fail_at + 1);
    assert!(rig.sink.events.contains(&AppEvent::MeasurementFailed(err)));
    assert_eq!(
        rig.phase_changes(),
        vec![
            (Phase::PumpUp, Phase::Deflate),
            (Phase::Deflate, Phase::Report),
            (Phase::Report, Phase::PumpUp),
        ]
    );
    assert!(rig.display.count_with("Measurement failed:") > 0);
    assert!(rig.display.count_with("sensor stayed busy") > 0);
    assert_eq!(rig.delay.count_of(1000), 30);
    assert_eq!(rig.service.vitals(), None);
}

#[test]
fn flat_deflation_has_too_few_beats() {
    let mut rig = Rig::new();
    let mut trace = pump_up_trace();
    trace.extend((0..=120).map(|i| 140 - i));
    let mut sensor = ScriptedSensor::new(trace, 0);

    let outcome = rig.cycle(&mut sensor);
    assert!(matches!(
        outcome,
        CycleOutcome::Failed(Error::Analysis(_))
    ));
    assert!(rig.display.count_with("too few heartbeats") > 0);
}

#[test]
fn service_recovers_after_failure() {
    let mut rig = Rig::new();
    let mut bad = ScriptedSensor::new(good_cycle(), 0).failing_at(3);
    assert!(matches!(rig.cycle(&mut bad), CycleOutcome::Failed(_)));

    let mut good = ScriptedSensor::new(good_cycle(), 0);
    assert!(matches!(rig.cycle(&mut good), CycleOutcome::Completed(_)));
}

// ── Debug mode ────────────────────────────────────────────────

#[test]
fn debug_mode_never_changes_sampling() {
    let mut plain = Rig::new();
    let mut s1 = ScriptedSensor::new(good_cycle(), 0);
    let o1 = plain.cycle(&mut s1);

    let mut debug = Rig::with_mode(FixedMode::on());
    let mut s2 = ScriptedSensor::new(good_cycle(), 0);
    let o2 = debug.cycle(&mut s2);

    assert_eq!(o1, o2);
    assert_eq!(s1.reads, s2.reads);
    assert_eq!(plain.delay.calls_ms, debug.delay.calls_ms);
}

#[test]
fn debug_mode_shows_sensor_status() {
    let mut rig = Rig::with_mode(FixedMode::on());
    let mut sensor = ScriptedSensor::new(good_cycle(), 0);
    rig.tick(&mut sensor);

    let frame = rig.display.last_foreground().unwrap();
    assert_eq!(frame.layer, Layer::Foreground);
    assert!(frame.has("DEBUG MODE"));
    assert!(frame.has("powered."));
    assert!(frame.has("is available."));
    assert!(rig.mode.polls > 0);
}

#[test]
fn pump_up_screen_tracks_pressure() {
    let mut rig = Rig::new();
    let mut sensor = ScriptedSensor::new(pump_up_trace(), 0);
    for _ in 0..3 {
        rig.tick(&mut sensor);
    }
    let frame = rig.display.last_foreground().unwrap();
    assert!(frame.has("40 mmHg"));
    assert!(frame.has("Keep pumping until"));
    assert_eq!(rig.service.phase(), Phase::PumpUp);
}

#[test]
fn start_clears_both_layers() {
    let rig = Rig::new();
    assert_eq!(rig.display.frames.len(), 2);
    assert!(rig.display.frames.iter().all(|f| f.lines.is_empty()));
    assert_eq!(rig.display.frames[0].layer, Layer::Background);
}

#[test]
fn event_log_is_formattable() {
    let mut rig = Rig::new();
    let mut sensor = stalled_sensor();
    rig.cycle(&mut sensor);
    assert!(rig.sink.lines().iter().any(|l| l.contains("SessionTimedOut")));
}
