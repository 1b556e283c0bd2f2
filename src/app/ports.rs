//! Port traits: the boundary between the control loops and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SensorPublisher / ThresholdActuator
//! ```
//!
//! The loops are generic over these traits, so nothing in [`crate::app`]
//! touches Redis, GPIO registers, or the I2C bus directly.  Binary outputs
//! and sleeps use the `embedded-hal` traits (`OutputPin`, `DelayNs`) rather
//! than a port of their own.

use crate::error::{BusError, SensorError};
use crate::message::{Reading, Topic};

// ───────────────────────────────────────────────────────────────
// Transport ports
// ───────────────────────────────────────────────────────────────

/// Publish side of the bus.
pub trait Publisher {
    /// Hand one payload to the bus.  Delivery is best-effort: a payload
    /// published while nobody listens is dropped and still counts as `Ok`.
    fn publish(&mut self, topic: &Topic, payload: &[u8]) -> Result<(), BusError>;
}

/// Subscribe side of the bus, bound to one topic at construction.
///
/// Subscription acknowledgements and other control traffic are consumed
/// by the adapter; only data payloads come out of here.
pub trait Subscriber {
    /// Wait for the next data payload.
    ///
    /// `Ok(None)` means nothing arrived within the adapter's poll window
    /// and the caller should check for shutdown and wait again.
    fn next_message(&mut self) -> Result<Option<Vec<u8>>, BusError>;

    /// Topic this subscription is bound to.
    fn topic(&self) -> &Topic;
}

// ───────────────────────────────────────────────────────────────
// Sensor ports
// ───────────────────────────────────────────────────────────────

/// A sensor that produces already-decoded physical values.
pub trait Sensor {
    /// Take one sample.  Failures are transient by contract.
    fn sample(&mut self) -> Result<Reading, SensorError>;
}

/// One analog conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogSample {
    pub raw: i16,
    pub voltage: f64,
}

/// Single-channel analog input (an ADC channel).
pub trait AnalogInput {
    fn read(&mut self) -> Result<AnalogSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// The loops emit structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
