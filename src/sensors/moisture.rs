//! Power-gated resistive soil moisture sensor read through an ADC.
//!
//! The sensor corrodes when powered continuously, so each sample powers it
//! through a GPIO enable line only for as long as the reading takes:
//!
//! ```text
//! enable  ___/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\___
//!            | settle |read| hold  |
//! ```
//!
//! The enable line is driven low again whether or not the conversion
//! succeeded.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::{AnalogInput, Sensor};
use crate::config::MoistureConfig;
use crate::error::SensorError;
use crate::message::{MoistureReading, Reading};

pub struct MoistureSensor<E, A, D> {
    enable: E,
    adc: A,
    delay: D,
    settle_ms: u32,
    hold_ms: u32,
}

impl<E, A, D> MoistureSensor<E, A, D>
where
    E: OutputPin,
    A: AnalogInput,
    D: DelayNs,
{
    /// Take the enable line and make sure the sensor starts unpowered.
    pub fn new(mut enable: E, adc: A, delay: D, config: &MoistureConfig) -> Result<Self, SensorError> {
        enable.set_low().map_err(enable_error)?;
        Ok(Self {
            enable,
            adc,
            delay,
            settle_ms: config.settle_ms,
            hold_ms: config.hold_ms,
        })
    }

    pub fn enable_line(&self) -> &E {
        &self.enable
    }

    pub fn into_inner(self) -> (E, A, D) {
        (self.enable, self.adc, self.delay)
    }

    /// Power the sensor for `settle + hold` around one conversion.  The
    /// hold runs even when the conversion fails, so every cycle keeps the
    /// sensor energised for the same time.
    fn powered_read(&mut self) -> Result<MoistureReading, SensorError> {
        self.enable.set_high().map_err(enable_error)?;
        self.delay.delay_ms(self.settle_ms);
        let sample = self.adc.read();
        self.delay.delay_ms(self.hold_ms);
        let sample = sample?;
        Ok(MoistureReading {
            value: i32::from(sample.raw),
            voltage: sample.voltage,
        })
    }
}

impl<E, A, D> Sensor for MoistureSensor<E, A, D>
where
    E: OutputPin,
    A: AnalogInput,
    D: DelayNs,
{
    fn sample(&mut self) -> Result<Reading, SensorError> {
        let reading = self.powered_read();
        let off = self.enable.set_low().map_err(enable_error);
        let reading = reading?;
        off?;
        Ok(reading.into())
    }
}

fn enable_error<E: embedded_hal::digital::Error>(e: E) -> SensorError {
    SensorError::EnableLine(format!("{:?}", e.kind()))
}
