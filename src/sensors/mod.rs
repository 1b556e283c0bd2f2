//! Sensor drivers.
//!
//! | Driver          | Implements    | Hardware                          |
//! |-----------------|---------------|-----------------------------------|
//! | `dht11`         | `Sensor`      | DHT11 on one GPIO (one-wire)      |
//! | `ads1115`       | `AnalogInput` | ADS1115 16-bit ADC on I2C bus 1   |
//! | `moisture`      | `Sensor`      | YL-69 sensor, power-gated by GPIO |
//!
//! The drivers are written against `embedded-hal` traits (plus the small
//! [`dht11::DataLine`] seam), so the protocol logic runs unchanged against
//! the fakes in the test suite.

pub mod ads1115;
pub mod dht11;
pub mod moisture;
