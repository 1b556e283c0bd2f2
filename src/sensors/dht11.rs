//! DHT11 temperature / humidity sensor.
//!
//! Single data line, open-drain with pull-up.  A read is:
//!
//! ```text
//!  host   ──┐  18 ms  ┌── release
//!           └─────────┘
//!  sensor               ┐ 80 µs ┌ 80 µs ┐ 50 µs ┌ 26–28 µs (0) / 70 µs (1) ┐ ...
//!                       └───────┘       └───────┘                          └
//! ```
//!
//! followed by 40 bits: humidity integral/decimal, temperature
//! integral/decimal, checksum.  The bit value is carried by the width of
//! the high pulse.  Userspace timing on Linux is jittery, so timeouts and
//! checksum failures are routine; the publisher skips those cycles.

use embedded_hal::delay::DelayNs;

use crate::app::ports::Sensor;
use crate::error::SensorError;
use crate::message::{Reading, ThermalReading};

pub const FRAME_BITS: usize = 40;
/// High pulses longer than this are a `1` bit.
pub const ONE_BIT_THRESHOLD_US: u32 = 50;
/// Host start signal length.
pub const START_SIGNAL_MS: u32 = 18;
/// Longest any single level is allowed to last before the read is abandoned.
pub const EDGE_TIMEOUT_US: u32 = 200;

/// The one seam between the protocol and the pin hardware.
pub trait DataLine {
    /// Actively drive the line low.
    fn drive_low(&mut self) -> Result<(), SensorError>;
    /// Stop driving and let the pull-up (and the sensor) own the line.
    fn release(&mut self) -> Result<(), SensorError>;
    /// Busy-wait until the line reads `high`.  Returns the microseconds
    /// waited, or `None` after `timeout_us`.
    fn wait_for(&mut self, high: bool, timeout_us: u32) -> Option<u32>;
}

pub struct Dht11<L, D> {
    line: L,
    delay: D,
}

impl<L: DataLine, D: DelayNs> Dht11<L, D> {
    pub fn new(line: L, delay: D) -> Self {
        Self { line, delay }
    }

    /// Run one start-signal / response / 40-bit exchange and return the
    /// width of every data-bit high pulse.
    pub fn capture(&mut self) -> Result<[u32; FRAME_BITS], SensorError> {
        self.line.drive_low()?;
        self.delay.delay_ms(START_SIGNAL_MS);
        self.line.release()?;

        // Response: sensor pulls low, then high, then low for the first bit.
        for level in [false, true, false] {
            self.line
                .wait_for(level, EDGE_TIMEOUT_US)
                .ok_or(SensorError::NoResponse)?;
        }

        let mut pulses = [0u32; FRAME_BITS];
        for (i, pulse) in pulses.iter_mut().enumerate() {
            self.line
                .wait_for(true, EDGE_TIMEOUT_US)
                .ok_or(SensorError::Timeout(i))?;
            *pulse = self
                .line
                .wait_for(false, EDGE_TIMEOUT_US)
                .ok_or(SensorError::Timeout(i))?;
        }
        Ok(pulses)
    }

    pub fn into_inner(self) -> (L, D) {
        (self.line, self.delay)
    }
}

impl<L: DataLine, D: DelayNs> Sensor for Dht11<L, D> {
    fn sample(&mut self) -> Result<Reading, SensorError> {
        let pulses = self.capture()?;
        let frame = decode_pulses(&pulses)?;
        Ok(frame_to_reading(frame)?.into())
    }
}

// ── Pure decoding ─────────────────────────────────────────────

/// Pack high-pulse widths into the 5-byte frame, MSB first.
pub fn decode_pulses(high_us: &[u32]) -> Result<[u8; 5], SensorError> {
    if high_us.len() < FRAME_BITS {
        return Err(SensorError::ShortFrame(high_us.len()));
    }

    let mut frame = [0u8; 5];
    for (i, &width) in high_us[..FRAME_BITS].iter().enumerate() {
        if width > ONE_BIT_THRESHOLD_US {
            frame[i / 8] |= 0x80 >> (i % 8);
        }
    }
    Ok(frame)
}

/// Verify the checksum and convert a frame to physical units.
///
/// Bit 7 of the temperature decimal byte flags a negative temperature.
pub fn frame_to_reading(frame: [u8; 5]) -> Result<ThermalReading, SensorError> {
    let [rh_int, rh_dec, t_int, t_dec, checksum] = frame;
    let sum = rh_int
        .wrapping_add(rh_dec)
        .wrapping_add(t_int)
        .wrapping_add(t_dec);
    if sum != checksum {
        return Err(SensorError::Checksum {
            expected: sum,
            actual: checksum,
        });
    }

    let humidity = f64::from(rh_int) + f64::from(rh_dec) / 10.0;
    let magnitude = f64::from(t_int) + f64::from(t_dec & 0x7f) / 10.0;
    let temperature_c = if t_dec & 0x80 != 0 { -magnitude } else { magnitude };

    Ok(ThermalReading {
        temperature_c,
        humidity,
    })
}
