//! Sensor publishing loop.
//!
//! ```text
//!  ┌──────────┐  sample()   ┌─────────────────┐  publish()  ┌─────┐
//!  │  Sensor  │ ──────────▶ │ SensorPublisher │ ──────────▶ │ Bus │
//!  └──────────┘             └─────────────────┘             └─────┘
//!                                   │ delay_ms(period)
//!                                   ▼
//!                               next cycle
//! ```
//!
//! A failed sample is reported and the cycle is skipped: no retry inside the
//! cycle and no backoff, the next tick is the retry.  A failed publish
//! means the bus is gone, which ends the loop with an error.

use embedded_hal::delay::DelayNs;

use crate::config::PublisherConfig;
use crate::error::BusError;
use crate::message::Topic;
use crate::shutdown::Shutdown;

use super::events::{AppEvent, Role};
use super::ports::{EventSink, Publisher, Sensor};

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Published,
    Skipped,
}

/// Polls one sensor and republishes every successful sample.
pub struct SensorPublisher<S, P, D> {
    sensor: S,
    bus: P,
    delay: D,
    topic: Topic,
    config: PublisherConfig,
    consecutive_failures: u32,
    published: u64,
}

impl<S, P, D> SensorPublisher<S, P, D>
where
    S: Sensor,
    P: Publisher,
    D: DelayNs,
{
    pub fn new(sensor: S, bus: P, delay: D, topic: Topic, config: PublisherConfig) -> Self {
        Self {
            sensor,
            bus,
            delay,
            topic,
            config,
            consecutive_failures: 0,
            published: 0,
        }
    }

    /// Sample once and publish on success.  Does not sleep.
    pub fn poll_once(&mut self, sink: &mut impl EventSink) -> Result<CycleOutcome, BusError> {
        let reading = match self.sensor.sample() {
            Ok(r) => r,
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                sink.emit(&AppEvent::SensorFailed {
                    error: e,
                    consecutive: self.consecutive_failures,
                });
                let every = self.config.failure_warn_every.max(1);
                if self.consecutive_failures % every == 0 {
                    sink.emit(&AppEvent::FailureStreak {
                        topic: self.topic.to_string(),
                        consecutive: self.consecutive_failures,
                    });
                }
                return Ok(CycleOutcome::Skipped);
            }
        };
        self.consecutive_failures = 0;

        let payload = match reading.to_json() {
            Ok(p) => p,
            Err(e) => {
                sink.emit(&AppEvent::EncodeFailed {
                    topic: self.topic.to_string(),
                    reason: format!("{reading:?}: {e}"),
                });
                return Ok(CycleOutcome::Skipped);
            }
        };

        self.bus.publish(&self.topic, &payload)?;
        self.published += 1;
        sink.emit(&AppEvent::Published {
            topic: self.topic.to_string(),
            reading,
        });
        Ok(CycleOutcome::Published)
    }

    /// Poll at the configured period until `shutdown` is requested or the
    /// bus fails.
    pub fn run(&mut self, shutdown: &Shutdown, sink: &mut impl EventSink) -> Result<(), BusError> {
        sink.emit(&AppEvent::Started {
            role: Role::Publisher,
            topic: self.topic.to_string(),
        });

        while !shutdown.is_requested() {
            self.poll_once(sink)?;
            self.delay.delay_ms(self.config.period_ms);
        }

        sink.emit(&AppEvent::Stopped {
            role: Role::Publisher,
        });
        Ok(())
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Failures since the last successful sample.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Total readings handed to the bus.
    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn bus(&self) -> &P {
        &self.bus
    }

    pub fn into_parts(self) -> (S, P, D) {
        (self.sensor, self.bus, self.delay)
    }
}
