//! Fuzz target: subscriber-side payload decoding
//!
//! Anything can arrive on a Redis channel.  Decoding must never panic,
//! and whatever `decode_field` accepts must be a finite number.
//!
//! cargo fuzz run fuzz_payload_decode

#![no_main]

use envmesh::message::{Reading, decode_field};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(Some(v)) = decode_field(data, "temperature_c") {
        assert!(v.is_finite(), "decoded non-finite temperature");
    }

    // A payload that parses as a reading must re-encode.
    if let Ok(reading) = Reading::from_json(data) {
        let _ = reading.to_json().expect("decoded reading must re-encode");
    }
});
