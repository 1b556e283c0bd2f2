//! Command-line surface shared by the three binaries.
//!
//! Parsing stays in `clap`; everything after that (pin lookup, topic
//! building, config validation) happens in the `plan` methods so it is
//! covered by tests without touching hardware or a broker.

use clap::{Args, Parser};

use crate::config::{ActuatorConfig, BusConfig, FAN_TOPIC, MoistureConfig, PublisherConfig};
use crate::error::ConfigError;
use crate::message::Topic;
use crate::pins::{self, PhysicalPin};

/// Broker location, common to every process.
#[derive(Debug, Clone, Args)]
pub struct BusArgs {
    /// Hostname or IP of redis server
    #[arg(long = "redis_host", default_value = "localhost")]
    pub redis_host: String,

    /// Port of redis server
    #[arg(long = "redis_port", default_value_t = 6379)]
    pub redis_port: u16,
}

impl BusArgs {
    pub fn to_config(&self) -> Result<BusConfig, ConfigError> {
        let config = BusConfig {
            host: self.redis_host.clone(),
            port: self.redis_port,
            ..BusConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

// ── dht-publisher ─────────────────────────────────────────────

/// DHT11 sensor data publisher
#[derive(Debug, Clone, Parser)]
#[command(name = "dht-publisher", version)]
pub struct DhtPublisherArgs {
    /// Board GPIO pin number to read
    #[arg(allow_negative_numbers = true)]
    pub gpio_pin: i64,

    /// Name of the topic under which messages will be published (will be
    /// prefixed by "sensor_msgs/")
    pub topic: String,

    #[command(flatten)]
    pub bus: BusArgs,
}

/// Everything the DHT publisher needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct DhtPlan {
    pub pin: PhysicalPin,
    pub topic: Topic,
    pub bus: BusConfig,
    pub publisher: PublisherConfig,
}

impl DhtPublisherArgs {
    pub fn plan(&self) -> Result<DhtPlan, ConfigError> {
        Ok(DhtPlan {
            pin: pins::resolve(self.gpio_pin)?,
            topic: Topic::sensor(&self.topic)?,
            bus: self.bus.to_config()?,
            publisher: PublisherConfig::default(),
        })
    }
}

// ── moisture-publisher ────────────────────────────────────────

/// YL-69 moisture sensor data publisher. Reads ADC input from the first
/// I2C bank (pins 3 and 5 on the Raspberry Pi header), and expects the
/// analog input to be on pin A0.
#[derive(Debug, Clone, Parser)]
#[command(name = "moisture-publisher", version)]
pub struct MoisturePublisherArgs {
    /// GPIO pin which is connected to the base of the transistor which
    /// enables the moisture sensor
    #[arg(allow_negative_numbers = true)]
    pub sensor_enable: i64,

    /// Name of the topic under which messages will be published (will be
    /// prefixed by "sensor_msgs/")
    pub topic: String,

    #[command(flatten)]
    pub bus: BusArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoisturePlan {
    pub enable_pin: PhysicalPin,
    pub topic: Topic,
    pub bus: BusConfig,
    pub moisture: MoistureConfig,
}

impl MoisturePublisherArgs {
    pub fn plan(&self) -> Result<MoisturePlan, ConfigError> {
        Ok(MoisturePlan {
            enable_pin: pins::resolve(self.sensor_enable)?,
            topic: Topic::sensor(&self.topic)?,
            bus: self.bus.to_config()?,
            moisture: MoistureConfig::default(),
        })
    }
}

// ── fan-controller ────────────────────────────────────────────

/// Fan controller: turns the fan on when it gets too hot
#[derive(Debug, Clone, Parser)]
#[command(name = "fan-controller", version)]
pub struct FanControllerArgs {
    /// Board GPIO pin number driving the fan
    #[arg(allow_negative_numbers = true)]
    pub gpio_pin: i64,

    /// Temperature threshold (°C); the fan runs at or above it
    #[arg(allow_negative_numbers = true)]
    pub threshold: f64,

    #[command(flatten)]
    pub bus: BusArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FanPlan {
    pub pin: PhysicalPin,
    pub topic: Topic,
    pub bus: BusConfig,
    pub actuator: ActuatorConfig,
}

impl FanControllerArgs {
    pub fn plan(&self) -> Result<FanPlan, ConfigError> {
        let pin = pins::resolve(self.gpio_pin)?;
        let actuator = ActuatorConfig {
            threshold: self.threshold,
            ..ActuatorConfig::default()
        };
        actuator.validate()?;
        Ok(FanPlan {
            pin,
            topic: Topic::parse(FAN_TOPIC)?,
            bus: self.bus.to_config()?,
            actuator,
        })
    }
}

// ── Logging ───────────────────────────────────────────────────

/// Install the process-wide log subscriber.
///
/// `RUST_LOG` overrides the default `info` level.  `log` records from the
/// library are picked up through the subscriber's `log` bridge.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();
}
