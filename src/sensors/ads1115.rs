//! ADS1115 16-bit ADC, single-shot on one channel.
//!
//! Each read writes the config register with the OS bit set, polls until
//! the conversion completes, then reads the conversion register.
//!
//! Config word `0xC383`:
//!
//! | Bits  | Field | Value | Meaning                |
//! |-------|-------|-------|------------------------|
//! | 15    | OS    | 1     | start a conversion     |
//! | 14:12 | MUX   | 100   | AIN0 vs GND            |
//! | 11:9  | PGA   | 001   | ±4.096 V full scale    |
//! | 8     | MODE  | 1     | single-shot            |
//! | 7:5   | DR    | 100   | 128 samples/s          |
//! | 4:0   | COMP  | 00011 | comparator disabled    |

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::app::ports::{AnalogInput, AnalogSample};
use crate::error::SensorError;

/// ADDR pin tied to GND.
pub const DEFAULT_ADDRESS: u8 = 0x48;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

pub const CONFIG_AIN0_SINGLE_4V096_128SPS: u16 = 0xC383;
const OS_READY: u16 = 0x8000;

/// PGA full-scale range for the config above.
pub const FULL_SCALE_V: f64 = 4.096;

/// One conversion at 128 SPS takes ~7.8 ms.
const POLL_INTERVAL_MS: u32 = 2;
const MAX_POLLS: u32 = 10;

/// Conversion result to volts.
pub fn raw_to_voltage(raw: i16) -> f64 {
    f64::from(raw) * FULL_SCALE_V / f64::from(i16::MAX)
}

pub struct Ads1115<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    config: u16,
}

impl<I: I2c, D: DelayNs> Ads1115<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            config: CONFIG_AIN0_SINGLE_4V096_128SPS,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn into_inner(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn write_register(&mut self, reg: u8, value: u16) -> Result<(), SensorError> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[reg, hi, lo])
            .map_err(i2c_error)
    }

    fn read_register(&mut self, reg: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(i2c_error)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Start one conversion and return the signed result.
    pub fn convert(&mut self) -> Result<i16, SensorError> {
        self.write_register(REG_CONFIG, self.config)?;

        let mut polls = 0;
        loop {
            self.delay.delay_ms(POLL_INTERVAL_MS);
            if self.read_register(REG_CONFIG)? & OS_READY != 0 {
                break;
            }
            polls += 1;
            if polls >= MAX_POLLS {
                return Err(SensorError::ConversionTimeout);
            }
        }

        Ok(self.read_register(REG_CONVERSION)? as i16)
    }
}

impl<I: I2c, D: DelayNs> AnalogInput for Ads1115<I, D> {
    fn read(&mut self) -> Result<AnalogSample, SensorError> {
        let raw = self.convert()?;
        Ok(AnalogSample {
            raw,
            voltage: raw_to_voltage(raw),
        })
    }
}

fn i2c_error<E: embedded_hal::i2c::Error>(e: E) -> SensorError {
    SensorError::Adc(format!("{:?}", e.kind()))
}
