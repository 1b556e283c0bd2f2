//! Threshold actuator. Subscribes to one topic and drives a binary output.
//!
//! ```text
//!            value >= threshold
//!   ┌─────┐ ──────────────────▶ ┌────┐
//!   │ Off │                     │ On │
//!   └─────┘ ◀────────────────── └────┘
//!            value <  threshold
//! ```
//!
//! Single inequality, no hysteresis band: a value hovering on the
//! threshold flips the output on every message.  `null` values and
//! malformed payloads leave the state untouched.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::ActuatorConfig;
use crate::error::{BusError, Error, HardwareError};
use crate::message::decode_field;
use crate::shutdown::Shutdown;

use super::events::{AppEvent, Role, SkipReason};
use super::ports::{EventSink, Subscriber};

/// Payload field the fan acts on.
pub const TEMPERATURE_FIELD: &str = "temperature_c";

// ───────────────────────────────────────────────────────────────
// State
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActuatorState {
    #[default]
    Off,
    On,
}

impl ActuatorState {
    /// Next state for a decoded value.  Depends only on the value, never
    /// on the current state.
    pub fn for_value(value: f64, threshold: f64) -> Self {
        if value >= threshold { Self::On } else { Self::Off }
    }

    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// What handling one payload did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handled {
    /// Output was driven to `state` for `value`.
    Actuated { value: f64, state: ActuatorState },
    /// Payload carried no usable value; nothing changed.
    Skipped,
}

// ───────────────────────────────────────────────────────────────
// ThresholdActuator
// ───────────────────────────────────────────────────────────────

pub struct ThresholdActuator<O, S, D> {
    output: O,
    subscription: S,
    delay: D,
    config: ActuatorConfig,
    state: ActuatorState,
}

impl<O, S, D> ThresholdActuator<O, S, D>
where
    O: OutputPin,
    S: Subscriber,
    D: DelayNs,
{
    /// Take ownership of the output and drive it to `Off`.
    pub fn new(
        mut output: O,
        subscription: S,
        delay: D,
        config: ActuatorConfig,
    ) -> Result<Self, HardwareError> {
        output.set_low().map_err(output_error)?;
        Ok(Self::assemble(output, subscription, delay, config))
    }

    /// Startup in the deployed order: the output is driven `Off` first,
    /// and only then is `subscribe` called on the connection the
    /// subscription borrows.  A subscribe failure leaves the output `Off`.
    pub fn open<'c, C: ?Sized>(
        mut output: O,
        conn: &'c mut C,
        subscribe: impl FnOnce(&'c mut C) -> Result<S, BusError>,
        delay: D,
        config: ActuatorConfig,
    ) -> Result<Self, Error> {
        output.set_low().map_err(output_error)?;
        let subscription = subscribe(conn)?;
        Ok(Self::assemble(output, subscription, delay, config))
    }

    fn assemble(output: O, subscription: S, delay: D, config: ActuatorConfig) -> Self {
        Self {
            output,
            subscription,
            delay,
            config,
            state: ActuatorState::Off,
        }
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_parts(self) -> (O, S, D) {
        (self.output, self.subscription, self.delay)
    }

    /// Decode one payload and drive the output.
    ///
    /// Decode problems are reported through `sink` and return
    /// [`Handled::Skipped`]; only a failed output write is an error.
    pub fn handle(
        &mut self,
        payload: &[u8],
        sink: &mut impl EventSink,
    ) -> Result<Handled, HardwareError> {
        let value = match decode_field(payload, TEMPERATURE_FIELD) {
            Ok(Some(v)) => v,
            Ok(None) => {
                sink.emit(&AppEvent::MessageSkipped(SkipReason::NoValue));
                return Ok(Handled::Skipped);
            }
            Err(e) => {
                sink.emit(&AppEvent::MessageSkipped(SkipReason::Malformed(e.to_string())));
                return Ok(Handled::Skipped);
            }
        };

        let next = ActuatorState::for_value(value, self.config.threshold);
        self.drive(next)?;
        let from = self.state;
        self.state = next;
        sink.emit(&AppEvent::Actuated {
            value,
            from,
            to: next,
        });
        Ok(Handled::Actuated { value, state: next })
    }

    /// Wait for one message and handle it.  Pacing applies only after a
    /// message that drove the output.
    pub fn step(&mut self, sink: &mut impl EventSink) -> Result<Option<Handled>, Error> {
        let Some(payload) = self.subscription.next_message()? else {
            return Ok(None);
        };
        let handled = self.handle(&payload, sink)?;
        if let Handled::Actuated { .. } = handled {
            self.delay.delay_ms(self.config.pacing_ms);
        }
        Ok(Some(handled))
    }

    /// Handle messages until `shutdown` is requested, then drive the
    /// output `Off`.  A bus or output failure ends the loop with an error;
    /// the output is still driven `Off` on the way out.
    pub fn run(&mut self, shutdown: &Shutdown, sink: &mut impl EventSink) -> Result<(), Error> {
        sink.emit(&AppEvent::Started {
            role: Role::Actuator,
            topic: self.subscription.topic().to_string(),
        });

        let mut result = Ok(());
        while !shutdown.is_requested() {
            if let Err(e) = self.step(sink) {
                result = Err(e);
                break;
            }
        }

        let off = self.shut_off();
        sink.emit(&AppEvent::Stopped {
            role: Role::Actuator,
        });
        result.and(off.map_err(Error::from))
    }

    /// Drive the output to the safe default.
    pub fn shut_off(&mut self) -> Result<(), HardwareError> {
        self.drive(ActuatorState::Off)?;
        self.state = ActuatorState::Off;
        Ok(())
    }

    fn drive(&mut self, state: ActuatorState) -> Result<(), HardwareError> {
        match state {
            ActuatorState::On => self.output.set_high(),
            ActuatorState::Off => self.output.set_low(),
        }
        .map_err(output_error)
    }
}

fn output_error<E: embedded_hal::digital::Error>(e: E) -> HardwareError {
    HardwareError::Output(format!("{:?}", e.kind()))
}
