//! Outbound application events.
//!
//! The control loops emit these through the
//! [`EventSink`](super::ports::EventSink) port.  In the binaries they end
//! up as log lines; tests collect them to assert on loop behaviour.

use crate::error::SensorError;
use crate::message::Reading;

use super::actuator::ActuatorState;

/// Which process emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Publisher,
    Actuator,
}

/// Why the actuator ignored a message.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Field present but `null`.
    NoValue,
    /// Payload could not be decoded.
    Malformed(String),
}

/// Structured events emitted by the control loops.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A loop is about to enter its first cycle.
    Started { role: Role, topic: String },

    /// A reading went out on the bus.
    Published { topic: String, reading: Reading },

    /// A sample failed and the cycle was skipped.
    SensorFailed { error: SensorError, consecutive: u32 },

    /// Every `failure_warn_every`-th failure in an unbroken streak.
    FailureStreak { topic: String, consecutive: u32 },

    /// A sample could not be serialized and was dropped.
    EncodeFailed { topic: String, reason: String },

    /// The actuator received a message it could not act on.
    MessageSkipped(SkipReason),

    /// The actuator drove its output after a decoded value.
    Actuated {
        value: f64,
        from: ActuatorState,
        to: ActuatorState,
    },

    /// A loop left its run loop after a shutdown request.
    Stopped { role: Role },
}
