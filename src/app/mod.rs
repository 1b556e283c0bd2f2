//! Application core: the control loops, with no direct I/O.
//!
//! [`publisher::SensorPublisher`] and [`actuator::ThresholdActuator`] hold
//! the behavioural contracts of the mesh.  All interaction with hardware
//! and the bus happens through the **port traits** in [`ports`] and the
//! `embedded-hal` traits, keeping this layer testable without a broker or
//! real pins.

pub mod actuator;
pub mod events;
pub mod ports;
pub mod publisher;
