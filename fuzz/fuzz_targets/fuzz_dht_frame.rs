//! Fuzz target: DHT11 pulse-width decoding
//!
//! Feeds arbitrary pulse widths through the bit packer and frame decoder.
//! Neither may panic, and any accepted frame must carry values inside the
//! range the 8-bit integral/decimal encoding can express.
//!
//! cargo fuzz run fuzz_dht_frame

#![no_main]

use envmesh::sensors::dht11::{decode_pulses, frame_to_reading};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let pulses: Vec<u32> = data.iter().map(|&b| u32::from(b)).collect();

    let Ok(frame) = decode_pulses(&pulses) else {
        assert!(pulses.len() < 40, "full capture must always pack");
        return;
    };

    if let Ok(r) = frame_to_reading(frame) {
        assert!((0.0..=280.5).contains(&r.humidity));
        assert!(r.temperature_c.abs() <= 267.7);
    }
});
