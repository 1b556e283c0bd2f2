//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade.  The binaries route that to stderr with
//! `tracing-subscriber`.

use log::{debug, error, info, warn};

use crate::app::actuator::ActuatorState;
use crate::app::events::{AppEvent, Role, SkipReason};
use crate::app::ports::EventSink;
use crate::message::Reading;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                role: Role::Publisher,
                topic,
            } => {
                info!("Publishing messages as JSONs on topic {}", topic);
            }
            AppEvent::Started {
                role: Role::Actuator,
                topic,
            } => {
                info!("Listening for readings on topic {}", topic);
            }
            AppEvent::Published { reading, .. } => match reading {
                // Moisture comes around every ten seconds; worth a line each.
                Reading::Moisture(_) => info!("{}", reading),
                Reading::Thermal(_) => debug!("{}", reading),
            },
            AppEvent::SensorFailed { error, .. } => {
                error!("Ignoring sensor error: {}", error);
            }
            AppEvent::FailureStreak { topic, consecutive } => {
                warn!("{} consecutive sensor failures on {}", consecutive, topic);
            }
            AppEvent::EncodeFailed { topic, reason } => {
                error!("Dropping unserializable reading for {}: {}", topic, reason);
            }
            AppEvent::MessageSkipped(SkipReason::NoValue) => {
                info!("Temperature: None");
            }
            AppEvent::MessageSkipped(SkipReason::Malformed(reason)) => {
                error!("Ignoring malformed message: {}", reason);
            }
            AppEvent::Actuated { value, to, .. } => {
                info!("Temperature: {}", value);
                match to {
                    ActuatorState::On => info!("Fan is on"),
                    ActuatorState::Off => info!("Fan is off"),
                }
            }
            AppEvent::Stopped { role } => {
                info!("{:?} stopped", role);
            }
        }
    }
}
