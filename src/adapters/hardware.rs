//! Raspberry Pi hardware adapter.
//!
//! The only module that opens real peripherals.  It hands back `rppal`
//! types that already implement the `embedded-hal` traits (with the `hal`
//! feature), plus [`IoLine`] for the DHT11 data line.

use std::time::Instant;

use log::info;
use rppal::gpio::{Bias, Gpio, IoPin, Mode, OutputPin};
use rppal::i2c::I2c;

use crate::error::{HardwareError, SensorError};
use crate::pins::{ADC_I2C_BUS, PhysicalPin};
use crate::sensors::dht11::DataLine;

/// The DHT11 data line idles high through the internal pull-up.
pub const DHT_LINE_BIAS: Bias = Bias::PullUp;

fn gpio_error(pin: PhysicalPin) -> impl Fn(rppal::gpio::Error) -> HardwareError {
    move |e| HardwareError::Gpio {
        pin: pin.bcm(),
        reason: e.to_string(),
    }
}

/// Claim `pin` as a push-pull output, starting low.
pub fn open_output(pin: PhysicalPin) -> Result<OutputPin, HardwareError> {
    let out = Gpio::new()
        .and_then(|gpio| gpio.get(pin.bcm()))
        .map_err(gpio_error(pin))?
        .into_output_low();
    info!("Configured {} as output", pin);
    Ok(out)
}

/// Claim `pin` as a DHT11 data line: input with the internal pull-up.
pub fn open_dht_line(pin: PhysicalPin) -> Result<IoLine, HardwareError> {
    let mut io = Gpio::new()
        .and_then(|gpio| gpio.get(pin.bcm()))
        .map_err(gpio_error(pin))?
        .into_io(Mode::Input);
    io.set_bias(DHT_LINE_BIAS);
    info!("Set up DHT11 sensor on GPIO pin {}", pin.bcm());
    Ok(IoLine(io))
}

/// Open the I2C bank the ADC sits on.
pub fn open_adc_bus() -> Result<I2c, HardwareError> {
    let bus = I2c::with_bus(ADC_I2C_BUS).map_err(|e| HardwareError::I2c(e.to_string()))?;
    info!("Set up I2C interface on bus {}", ADC_I2C_BUS);
    Ok(bus)
}

/// Bidirectional GPIO driven as an open-drain line.
pub struct IoLine(IoPin);

impl DataLine for IoLine {
    fn drive_low(&mut self) -> Result<(), SensorError> {
        self.0.set_mode(Mode::Output);
        self.0.set_low();
        Ok(())
    }

    fn release(&mut self) -> Result<(), SensorError> {
        self.0.set_mode(Mode::Input);
        Ok(())
    }

    fn wait_for(&mut self, high: bool, timeout_us: u32) -> Option<u32> {
        let start = Instant::now();
        loop {
            let waited = start.elapsed().as_micros() as u32;
            if self.0.is_high() == high {
                return Some(waited);
            }
            if waited > timeout_us {
                return None;
            }
        }
    }
}
