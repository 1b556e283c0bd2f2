//! envmesh: sensor publishers and a threshold actuator for Raspberry Pi
//! boards, wired together over Redis pub/sub.
//!
//! ```text
//! ┌───────────────┐   sensor_msgs/humidity1   ┌────────────────┐
//! │ dht-publisher │ ────────────────────────▶ │ fan-controller │
//! └───────────────┘          Redis            └────────────────┘
//! ┌────────────────────┐  sensor_msgs/<name>
//! │ moisture-publisher │ ──────────────────▶  (any subscriber)
//! └────────────────────┘
//! ```
//!
//! The control loops in [`app`] are generic over port traits and the
//! `embedded-hal` traits; [`adapters`] supplies Redis, in-memory, and
//! Raspberry Pi implementations.  Hardware access is behind the `rpi`
//! feature so the rest builds and tests on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod pins;
pub mod sensors;
pub mod shutdown;

pub use error::Error;
pub use message::{MoistureReading, Reading, ThermalReading, Topic};
pub use shutdown::Shutdown;
