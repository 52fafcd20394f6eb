//! Full-stack tests: the real `PressureSensor` driver over a simulated
//! I2C device, plugged into the measurement service.

use crate::mock_hw::{
    FixedMode, LogSink, RecordingDisplay, SimulatedBus, VirtualDelay, code_for, good_cycle,
    pump_up_trace,
};

use cuffcore::app::ports::SensorPort;
use cuffcore::app::service::MeasurementService;
use cuffcore::config::{MeasurementConfig, SensorConfig};
use cuffcore::error::{Error, SensorError};
use cuffcore::fsm::context::CycleOutcome;
use cuffcore::sensors::frame::StatusFlags;
use cuffcore::sensors::pressure::PressureSensor;
use cuffcore::sensors::transfer::PressureConverter;

fn driver(bus: SimulatedBus) -> PressureSensor<SimulatedBus, VirtualDelay> {
    PressureSensor::new(bus, VirtualDelay::new(), SensorConfig::DEFAULT)
}

#[test]
fn code_for_inverts_the_transfer_function() {
    let conv = PressureConverter::new(&SensorConfig::DEFAULT);
    for p in [0, 1, 29, 30, 31, 149, 150, 151, 299, 300] {
        assert_eq!(conv.mmhg(code_for(p)), p, "p = {p}");
    }
}

#[test]
fn driver_reads_trace_through_port() {
    let mut sensor = driver(SimulatedBus::new([0, 75, 150], 0));
    let got: Vec<i32> = (0..3)
        .map(|_| SensorPort::read_pressure(&mut sensor).unwrap().mmhg)
        .collect();
    assert_eq!(got, [0, 75, 150]);
    assert_eq!(
        SensorPort::last_status(&sensor),
        Some(StatusFlags(StatusFlags::POWERED))
    );

    let (bus, delay) = sensor.release();
    assert_eq!(bus.writes, 6);
    assert_eq!(bus.status_reads, 3);
    assert_eq!(bus.frame_reads, 3);
    // 10 ms after every command
    assert_eq!(delay.elapsed_ms(), 60);
}

#[test]
fn busy_polls_add_a_command_each() {
    let mut bus = SimulatedBus::new([100, 100], 0);
    bus.busy_polls = 3;
    let mut sensor = driver(bus);
    sensor.read_pressure().unwrap();
    // the second frame waits out three busy polls
    sensor.read_pressure().unwrap();

    let (bus, delay) = sensor.release();
    assert_eq!(bus.status_reads, 1 + 4);
    assert_eq!(bus.writes, 2 + 5);
    assert_eq!(delay.calls_ms, vec![10; 7]);
}

#[test]
fn full_cycle_over_the_bus() {
    let mut sensor = driver(SimulatedBus::new(good_cycle(), 0));
    let mut service = MeasurementService::new(MeasurementConfig::default());
    let mut display = RecordingDisplay::new();
    let mut mode = FixedMode::off();
    let mut delay = VirtualDelay::new();
    let mut sink = LogSink::new();
    service.start(&mut display, &mut sink);

    let outcome = service.run_cycle(&mut sensor, &mut display, &mut mode, &mut delay, &mut sink);
    let CycleOutcome::Completed(v) = outcome else {
        panic!("expected vitals, got {outcome:?}");
    };
    assert_eq!(v.heart_rate_bpm, 73);
    assert_eq!(v.systolic_mmhg, 151);
    assert_eq!(v.map_mmhg, 116);
    assert_eq!(v.diastolic_mmhg, 98);
    assert_eq!(v.beats, 42);

    let reads = good_cycle().len();
    let (bus, sensor_delay) = sensor.release();
    assert_eq!(bus.frame_reads, reads);
    assert_eq!(bus.writes, 2 * reads);
    // fixed wait in the service plus two command gaps in the driver
    let per_sample =
        delay.count_of(100) as u64 * 100 + sensor_delay.elapsed_ms();
    assert_eq!(per_sample, reads as u64 * 120);
}

#[test]
fn stuck_sensor_fails_the_cycle() {
    let mut bus = SimulatedBus::new(pump_up_trace(), 0);
    bus.stuck_busy = true;
    let mut sensor = driver(bus);
    let mut service = MeasurementService::new(MeasurementConfig::default());
    let mut display = RecordingDisplay::new();
    let mut mode = FixedMode::off();
    let mut delay = VirtualDelay::new();
    let mut sink = LogSink::new();
    service.start(&mut display, &mut sink);

    let outcome = service.run_cycle(&mut sensor, &mut display, &mut mode, &mut delay, &mut sink);
    assert_eq!(
        outcome,
        CycleOutcome::Failed(Error::Sensor(SensorError::BusyTimeout {
            polls: SensorConfig::DEFAULT.max_busy_polls
        }))
    );
    assert!(display.count_with("sensor stayed busy") > 0);
}
