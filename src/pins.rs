//! GPIO pin allow-list for the Raspberry Pi 40-pin header.
//!
//! Single source of truth for which BCM GPIO numbers a process may claim.
//! Pins that double as SPI, I2C, or UART lines are left out so a sensor or
//! fan wired to the wrong header position cannot fight a bus peripheral.
//! Every lookup happens once at startup, before any bus connection or
//! hardware handle is opened.

use core::fmt;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Allow-list
// ---------------------------------------------------------------------------

/// BCM GPIO numbers available to sensors and actuators.
pub const BOARD_PINS: [u8; 17] = [
    4, 17, 27, 22, 5, 6, 7, 13, 19, 26, 23, 24, 25, 12, 16, 20, 21,
];

// ---------------------------------------------------------------------------
// Reserved banks
// ---------------------------------------------------------------------------

/// I2C bus 1: SDA/SCL.  The moisture ADC lives here.
pub const I2C1_PINS: [u8; 2] = [2, 3];
/// ID EEPROM I2C bus (HAT detection).
pub const I2C0_PINS: [u8; 2] = [0, 1];
/// SPI0: CE0, MISO, MOSI, SCLK.
pub const SPI0_PINS: [u8; 4] = [8, 9, 10, 11];
/// Primary UART: TXD/RXD.
pub const UART_PINS: [u8; 2] = [14, 15];

/// I2C bus number the ADS1115 is attached to.
pub const ADC_I2C_BUS: u8 = 1;

// ---------------------------------------------------------------------------
// Physical pin handle
// ---------------------------------------------------------------------------

/// Opaque handle for a validated header pin.
///
/// Only [`resolve`] constructs one, so holding a `PhysicalPin` proves the
/// number passed the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalPin(u8);

impl PhysicalPin {
    /// BCM GPIO number, as expected by the GPIO driver.
    pub const fn bcm(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PhysicalPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// Map a logical GPIO number to its physical pin.
///
/// Fails with [`ConfigError::ReservedPin`] for pins belonging to a bus bank
/// and [`ConfigError::InvalidPin`] for anything else off the list.
pub fn resolve(gpio_pin: i64) -> Result<PhysicalPin, ConfigError> {
    let Ok(pin) = u8::try_from(gpio_pin) else {
        return Err(ConfigError::InvalidPin(gpio_pin));
    };

    if BOARD_PINS.contains(&pin) {
        return Ok(PhysicalPin(pin));
    }

    match reserved_bank(pin) {
        Some(bank) => Err(ConfigError::ReservedPin { pin: gpio_pin, bank }),
        None => Err(ConfigError::InvalidPin(gpio_pin)),
    }
}

fn reserved_bank(pin: u8) -> Option<&'static str> {
    if I2C1_PINS.contains(&pin) {
        Some("I2C1")
    } else if I2C0_PINS.contains(&pin) {
        Some("I2C0 (ID EEPROM)")
    } else if SPI0_PINS.contains(&pin) {
        Some("SPI0")
    } else if UART_PINS.contains(&pin) {
        Some("UART")
    } else {
        None
    }
}
