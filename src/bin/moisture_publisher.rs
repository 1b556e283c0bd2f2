//! Publishes YL-69 soil moisture readings, taken through an ADS1115 on
//! I2C bus 1, on Redis.
//!
//! ```text
//! moisture-publisher <sensor_enable> <topic> [--redis_host HOST] [--redis_port PORT]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use envmesh::Shutdown;
use envmesh::adapters::hardware;
use envmesh::adapters::log_sink::LogEventSink;
use envmesh::adapters::redis_bus::RedisPublisher;
use envmesh::adapters::time::SystemDelay;
use envmesh::app::publisher::SensorPublisher;
use envmesh::cli::{self, MoisturePublisherArgs};
use envmesh::sensors::ads1115::Ads1115;
use envmesh::sensors::moisture::MoistureSensor;

fn main() {
    cli::init_logging();
    if let Err(e) = run(&MoisturePublisherArgs::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: &MoisturePublisherArgs) -> Result<()> {
    let plan = args.plan()?;

    let shutdown = Shutdown::new();
    shutdown
        .install_signal_handler()
        .context("installing signal handler")?;

    let bus = RedisPublisher::connect(&plan.bus)?;

    let enable = hardware::open_output(plan.enable_pin)?;
    let adc = Ads1115::new(hardware::open_adc_bus()?, SystemDelay);
    info!("Ready to read input on channel P0 (ADS1115 at {:#04x})", adc.address());
    let sensor = MoistureSensor::new(enable, adc, SystemDelay, &plan.moisture)
        .context("switching moisture sensor off")?;

    let mut publisher = SensorPublisher::new(
        sensor,
        bus,
        SystemDelay,
        plan.topic,
        plan.moisture.publisher(),
    );
    publisher.run(&shutdown, &mut LogEventSink::new())?;
    Ok(())
}
