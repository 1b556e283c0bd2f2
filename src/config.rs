//! Runtime configuration for the three processes.
//!
//! Defaults are the cadences the deployed boards run with.  Values are
//! fixed for the lifetime of a process; there is no reload path.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed prefix every sensor topic lives under.
pub const TOPIC_PREFIX: &str = "sensor_msgs/";

/// Topic the fan controller listens on.  The name says humidity, but the
/// DHT publisher on that topic carries `temperature_c` too, and that is the
/// field the fan acts on.
pub const FAN_TOPIC: &str = "sensor_msgs/humidity1";

// ── Bus ───────────────────────────────────────────────────────

/// Where the Redis broker lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    pub host: String,
    pub port: u16,
    /// Logical Redis database index.
    pub db: u8,
    /// Read timeout on a subscription.  Only used to observe shutdown
    /// between messages; a timeout is never treated as an error.
    pub read_timeout_ms: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            read_timeout_ms: 1000,
        }
    }
}

impl BusConfig {
    /// `redis://host:port/db`
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    /// `host:port`, for log lines.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "redis_host",
                reason: "must not be empty",
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "redis_port",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }
}

// ── Publishers ────────────────────────────────────────────────

/// Cadence of the DHT publisher loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Sleep between poll cycles (milliseconds).
    pub period_ms: u32,
    /// Log a warning every N consecutive sensor failures.
    pub failure_warn_every: u32,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            failure_warn_every: 10,
        }
    }
}

/// Duty-cycling of the power-gated moisture sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoistureConfig {
    /// Time the sensor is powered before sampling (milliseconds).
    pub settle_ms: u32,
    /// Time the sensor stays powered after sampling (milliseconds).
    pub hold_ms: u32,
    /// Sleep between cycles (milliseconds).
    pub period_ms: u32,
}

impl Default for MoistureConfig {
    fn default() -> Self {
        Self {
            settle_ms: 500,
            hold_ms: 500,
            period_ms: 10_000,
        }
    }
}

impl MoistureConfig {
    /// Publisher cadence for the moisture loop.
    pub fn publisher(&self) -> PublisherConfig {
        PublisherConfig {
            period_ms: self.period_ms,
            ..PublisherConfig::default()
        }
    }
}

// ── Actuator ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Output turns on at or above this value (°C).
    pub threshold: f64,
    /// Pause after each handled message (milliseconds).
    pub pacing_ms: u32,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            threshold: 25.0,
            pacing_ms: 1000,
        }
    }
}

impl ActuatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "threshold",
                reason: "must be a finite number",
            });
        }
        Ok(())
    }
}
