//! Publishes DHT11 temperature and humidity readings on Redis.
//!
//! ```text
//! dht-publisher <gpio_pin> <topic> [--redis_host HOST] [--redis_port PORT]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use envmesh::Shutdown;
use envmesh::adapters::hardware;
use envmesh::adapters::log_sink::LogEventSink;
use envmesh::adapters::redis_bus::RedisPublisher;
use envmesh::adapters::time::SystemDelay;
use envmesh::app::publisher::SensorPublisher;
use envmesh::cli::{self, DhtPublisherArgs};
use envmesh::sensors::dht11::Dht11;

fn main() {
    cli::init_logging();
    if let Err(e) = run(&DhtPublisherArgs::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: &DhtPublisherArgs) -> Result<()> {
    let plan = args.plan()?;

    let shutdown = Shutdown::new();
    shutdown
        .install_signal_handler()
        .context("installing signal handler")?;

    let bus = RedisPublisher::connect(&plan.bus)?;
    let sensor = Dht11::new(hardware::open_dht_line(plan.pin)?, SystemDelay);

    let mut publisher = SensorPublisher::new(sensor, bus, SystemDelay, plan.topic, plan.publisher);
    publisher.run(&shutdown, &mut LogEventSink::new())?;
    Ok(())
}
