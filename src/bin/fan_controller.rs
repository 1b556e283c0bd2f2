//! Turns a fan on when the temperature published on
//! `sensor_msgs/humidity1` reaches a threshold.
//!
//! ```text
//! fan-controller <gpio_pin> <threshold> [--redis_host HOST] [--redis_port PORT]
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use envmesh::Shutdown;
use envmesh::adapters::hardware;
use envmesh::adapters::log_sink::LogEventSink;
use envmesh::adapters::redis_bus::{self, RedisSubscription};
use envmesh::adapters::time::SystemDelay;
use envmesh::app::actuator::ThresholdActuator;
use envmesh::cli::{self, FanControllerArgs};

fn main() {
    cli::init_logging();
    if let Err(e) = run(&FanControllerArgs::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: &FanControllerArgs) -> Result<()> {
    let plan = args.plan()?;

    let shutdown = Shutdown::new();
    shutdown
        .install_signal_handler()
        .context("installing signal handler")?;

    let mut conn = redis_bus::connect(&plan.bus)?;
    let fan = hardware::open_output(plan.pin)?;
    let read_timeout = Duration::from_millis(plan.bus.read_timeout_ms);
    let topic = plan.topic;
    let mut controller = ThresholdActuator::open(
        fan,
        &mut conn,
        |conn| RedisSubscription::new(conn, topic, read_timeout),
        SystemDelay,
        plan.actuator,
    )?;
    controller.run(&shutdown, &mut LogEventSink::new())?;
    Ok(())
}
