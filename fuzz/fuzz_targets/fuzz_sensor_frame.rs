//! Fuzz target: `RawFrame::from_bytes` + `PressureConverter::mmhg`
//!
//! Decodes arbitrary 4-byte chunks as sensor frames and converts them,
//! asserting the decoder keeps only 24 pressure bits and the converter
//! stays monotonic between neighbouring codes.
//!
//! cargo fuzz run fuzz_sensor_frame

#![no_main]

use cuffcore::sensors::frame::RawFrame;
use cuffcore::sensors::transfer::PressureConverter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let conv = PressureConverter::default();
    for chunk in data.chunks_exact(RawFrame::LEN) {
        let bytes = [chunk[0], chunk[1], chunk[2], chunk[3]];
        let frame = RawFrame::from_bytes(bytes);
        assert!(frame.pressure_code <= 0x00FF_FFFF);
        assert_eq!(frame.status.bits(), bytes[0]);

        let p = conv.mmhg(frame.pressure_code);
        if frame.pressure_code < 0x00FF_FFFF {
            assert!(conv.mmhg(frame.pressure_code + 1) >= p);
        }
    }
});
