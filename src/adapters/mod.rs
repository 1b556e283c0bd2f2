//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter      | Implements                  | Connects to                 |
//! |--------------|-----------------------------|-----------------------------|
//! | `redis_bus`  | Publisher, Subscriber       | Redis pub/sub               |
//! | `memory_bus` | Publisher, Subscriber       | In-process queues           |
//! | `hardware`   | OutputPin, DataLine, I2c    | Raspberry Pi GPIO / I2C     |
//! | `log_sink`   | EventSink                   | `log` facade                |
//! | `time`       | DelayNs                     | `std::thread::sleep`        |
//!
//! `hardware` only exists with the `rpi` feature; everything else builds
//! on any host.

#[cfg(feature = "rpi")]
pub mod hardware;
pub mod log_sink;
pub mod memory_bus;
pub mod redis_bus;
pub mod time;
