//! Wire schema shared by publishers and the actuator.
//!
//! One JSON object per publish, no envelope and no version field.  The
//! producer and consumer agree on the shape out of band through the topic
//! name:
//!
//! ```text
//! sensor_msgs/<thermal>   {"temperature_c": 23.0, "humidity": 41.0}
//! sensor_msgs/<moisture>  {"value": 17344, "voltage": 2.168}
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::TOPIC_PREFIX;
use crate::error::{ConfigError, DecodeError};

// ── Topic ─────────────────────────────────────────────────────

/// A validated `sensor_msgs/<name>` channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Build a topic from the bare name given on the command line.
    pub fn sensor(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidTopic(name.to_string()));
        }
        Ok(Self(format!("{TOPIC_PREFIX}{name}")))
    }

    /// Accept an already-prefixed topic string.
    pub fn parse(full: &str) -> Result<Self, ConfigError> {
        match full.strip_prefix(TOPIC_PREFIX) {
            Some(name) => Self::sensor(name),
            None => Err(ConfigError::InvalidTopic(full.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Readings ──────────────────────────────────────────────────

/// DHT-class sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalReading {
    pub temperature_c: f64,
    pub humidity: f64,
}

/// Moisture sensor sample as seen through the ADC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureReading {
    /// Raw conversion result.
    pub value: i32,
    /// Input voltage derived from `value` and the ADC full-scale range.
    pub voltage: f64,
}

/// A successful sensor sample, ready to publish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Thermal(ThermalReading),
    Moisture(MoistureReading),
}

impl Reading {
    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(payload: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

impl From<ThermalReading> for Reading {
    fn from(r: ThermalReading) -> Self {
        Self::Thermal(r)
    }
}

impl From<MoistureReading> for Reading {
    fn from(r: MoistureReading) -> Self {
        Self::Moisture(r)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thermal(t) => write!(
                f,
                "temperature: {:.1}\u{00b0}C, humidity: {:.1}%",
                t.temperature_c, t.humidity
            ),
            Self::Moisture(m) => write!(f, "value: {}, raw voltage: {}", m.value, m.voltage),
        }
    }
}

// ── Decoding on the subscriber side ───────────────────────────

/// Pull one numeric field out of a subscribed payload.
///
/// Returns `Ok(None)` when the field is present but `null`, which is the
/// "no reading" signal; every other deviation is a [`DecodeError`].
pub fn decode_field(payload: &[u8], field: &'static str) -> Result<Option<f64>, DecodeError> {
    let value: Value = serde_json::from_slice(payload)?;
    let Value::Object(map) = value else {
        return Err(DecodeError::NotAnObject);
    };

    match map.get(field) {
        None => Err(DecodeError::MissingField(field)),
        Some(Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or(DecodeError::NotNumeric(field)),
    }
}
