//! Unified error types for the envmesh processes.
//!
//! Each concern gets its own enum so the control loops can match on exactly
//! the failures they are allowed to recover from.  The fatal classes convert
//! into the crate-wide [`Error`]; the binaries wrap everything in `anyhow`
//! at the edge.  Sensor and decode errors never leave their loop.
//!
//! | Class         | Policy                                  |
//! |---------------|-----------------------------------------|
//! | `Config`      | fatal before any loop starts            |
//! | `Bus`         | fatal (publish/subscribe unreachable)   |
//! | `Hardware`    | fatal (GPIO / I2C could not be opened)  |
//! | `Sensor`      | recoverable: log and skip the cycle     |
//! | `Decode`      | recoverable: log and skip the message   |

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("bus: {0}")]
    Bus(#[from] BusError),
    #[error("hardware: {0}")]
    Hardware(#[from] HardwareError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Pin is outside the allow-list and not part of a reserved bank.
    #[error("GPIO pin {0} is invalid")]
    InvalidPin(i64),
    /// Pin belongs to a bus the board reserves (I2C, SPI, UART).
    #[error("GPIO pin {pin} is reserved for {bank}")]
    ReservedPin { pin: i64, bank: &'static str },
    #[error("invalid topic name {0:?}")]
    InvalidTopic(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BusError {
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: redis::RedisError,
    },
    #[error("publish on {topic} failed: {source}")]
    Publish {
        topic: String,
        #[source]
        source: redis::RedisError,
    },
    #[error("subscribe to {topic} failed: {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: redis::RedisError,
    },
    #[error("receive failed: {0}")]
    Receive(#[source] redis::RedisError),
    /// The in-memory bus was torn down underneath a client.
    #[error("bus closed")]
    Closed,
}

// ---------------------------------------------------------------------------
// Hardware bring-up errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("GPIO {pin}: {reason}")]
    Gpio { pin: u8, reason: String },
    #[error("I2C: {0}")]
    I2c(String),
    #[error("output write failed: {0}")]
    Output(String),
}

// ---------------------------------------------------------------------------
// Sensor errors (transient)
// ---------------------------------------------------------------------------

/// Sampling failures.  All of these are expected in normal operation and
/// are handled by skipping the current cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The sensor did not answer the start signal in time.
    #[error("sensor not responding")]
    NoResponse,
    /// A bit edge did not arrive within the protocol window.
    #[error("timed out waiting for edge {0}")]
    Timeout(usize),
    /// Fewer data bits than a full frame were captured.
    #[error("short frame: {0} bits")]
    ShortFrame(usize),
    #[error("checksum mismatch (expected {expected:#04x}, got {actual:#04x})")]
    Checksum { expected: u8, actual: u8 },
    #[error("ADC read failed: {0}")]
    Adc(String),
    #[error("ADC conversion did not complete")]
    ConversionTimeout,
    #[error("enable line: {0}")]
    EnableLine(String),
}

// ---------------------------------------------------------------------------
// Decode errors (subscribed payloads)
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("missing field {0:?}")]
    MissingField(&'static str),
    #[error("field {0:?} is not a number")]
    NotNumeric(&'static str),
}
