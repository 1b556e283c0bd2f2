//! Publisher → bus → actuator, all in one process over [`MemoryBus`].

use std::collections::VecDeque;

use envmesh::Shutdown;
use envmesh::adapters::memory_bus::{MemoryBus, MemorySubscription};
use envmesh::app::actuator::{ActuatorState, ThresholdActuator};
use envmesh::app::ports::{AnalogInput, AnalogSample, Publisher, Subscriber};
use envmesh::app::publisher::SensorPublisher;
use envmesh::cli::{DhtPublisherArgs, FanControllerArgs, MoisturePublisherArgs};
use envmesh::config::{ActuatorConfig, FAN_TOPIC, MoistureConfig, PublisherConfig};
use envmesh::error::{BusError, ConfigError, Error, SensorError};
use envmesh::message::{MoistureReading, Reading, Topic};
use envmesh::sensors::dht11::{DataLine, Dht11};
use envmesh::sensors::moisture::MoistureSensor;

use clap::Parser;

use crate::mock_hw::{CollectingSink, CountingDelay, RecordingPin, ScriptedSensor};

/// DHT11 line that answers every read with the same frame.
struct ReplayLine {
    frame: [u8; 5],
    waits: VecDeque<Option<u32>>,
}

impl ReplayLine {
    fn new(humidity: u8, temperature: u8) -> Self {
        let checksum = humidity.wrapping_add(temperature);
        Self {
            frame: [humidity, 0, temperature, 0, checksum],
            waits: VecDeque::new(),
        }
    }
}

impl DataLine for ReplayLine {
    fn drive_low(&mut self) -> Result<(), SensorError> {
        self.waits = VecDeque::from([Some(20), Some(80), Some(80)]);
        for i in 0..40 {
            let one = self.frame[i / 8] & (0x80 >> (i % 8)) != 0;
            self.waits.push_back(Some(50));
            self.waits.push_back(Some(if one { 70 } else { 26 }));
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn wait_for(&mut self, _high: bool, _timeout_us: u32) -> Option<u32> {
        self.waits.pop_front().flatten()
    }
}

fn fan_topic() -> Topic {
    Topic::parse(FAN_TOPIC).unwrap()
}

fn fan_on(
    bus: &MemoryBus,
    threshold: f64,
) -> ThresholdActuator<RecordingPin, MemorySubscription, CountingDelay> {
    ThresholdActuator::new(
        RecordingPin::new(),
        bus.subscribe(fan_topic()),
        CountingDelay::unbounded(),
        ActuatorConfig {
            threshold,
            ..ActuatorConfig::default()
        },
    )
    .unwrap()
}

#[test]
fn hot_room_turns_fan_on() {
    let bus = MemoryBus::new();
    let mut fan = fan_on(&bus, 25.0);
    let mut publisher = SensorPublisher::new(
        Dht11::new(ReplayLine::new(40, 30), CountingDelay::unbounded()),
        bus.clone(),
        CountingDelay::unbounded(),
        fan_topic(),
        PublisherConfig::default(),
    );
    let mut sink = CollectingSink::new();

    publisher.poll_once(&mut sink).unwrap();
    fan.step(&mut sink).unwrap();

    assert_eq!(fan.state(), ActuatorState::On);
    assert!(fan.output().is_high());
}

#[test]
fn cool_room_keeps_fan_off() {
    let bus = MemoryBus::new();
    let mut fan = fan_on(&bus, 25.0);
    let mut publisher = SensorPublisher::new(
        Dht11::new(ReplayLine::new(40, 20), CountingDelay::unbounded()),
        bus.clone(),
        CountingDelay::unbounded(),
        fan_topic(),
        PublisherConfig::default(),
    );
    let mut sink = CollectingSink::new();

    publisher.poll_once(&mut sink).unwrap();
    fan.step(&mut sink).unwrap();

    assert_eq!(fan.state(), ActuatorState::Off);
    assert!(!fan.output().is_high());
}

#[test]
fn null_reading_leaves_fan_running() {
    let mut bus = MemoryBus::new();
    let mut fan = fan_on(&bus, 25.0);
    let mut sink = CollectingSink::new();

    let mut publisher = SensorPublisher::new(
        ScriptedSensor::thermal(&[30.0]),
        bus.clone(),
        CountingDelay::unbounded(),
        fan_topic(),
        PublisherConfig::default(),
    );
    publisher.poll_once(&mut sink).unwrap();
    fan.step(&mut sink).unwrap();
    assert_eq!(fan.state(), ActuatorState::On);

    bus.publish(&fan_topic(), br#"{"temperature_c": null, "humidity": 40}"#)
        .unwrap();
    fan.step(&mut sink).unwrap();
    assert_eq!(fan.state(), ActuatorState::On);
}

#[test]
fn reserved_pin_is_rejected_before_startup() {
    let args = DhtPublisherArgs::try_parse_from(["dht-publisher", "2", "humidity1"]).unwrap();
    let err = args.plan().unwrap_err();
    assert!(matches!(err, ConfigError::ReservedPin { pin: 2, .. }));
    assert_eq!(err.to_string(), "GPIO pin 2 is reserved for I2C1");
}

#[test]
fn fan_controller_rejects_i2c_clock_pin() {
    let args = FanControllerArgs::try_parse_from(["fan-controller", "3", "25"]).unwrap();
    let err = args.plan().unwrap_err();
    assert_eq!(err, ConfigError::ReservedPin { pin: 3, bank: "I2C1" });
}

#[test]
fn moisture_publisher_rejects_i2c_clock_pin() {
    let args = MoisturePublisherArgs::try_parse_from(["moisture-publisher", "3", "soil"]).unwrap();
    let err = args.plan().unwrap_err();
    assert_eq!(err, ConfigError::ReservedPin { pin: 3, bank: "I2C1" });
    assert_eq!(err.to_string(), "GPIO pin 3 is reserved for I2C1");
}

#[test]
fn bus_loss_stops_actuator_with_fan_off() {
    let bus = MemoryBus::new();
    let mut fan = fan_on(&bus, 25.0);
    let mut publisher = SensorPublisher::new(
        ScriptedSensor::thermal(&[35.0]),
        bus.clone(),
        CountingDelay::unbounded(),
        fan_topic(),
        PublisherConfig::default(),
    );
    publisher.poll_once(&mut CollectingSink::new()).unwrap();
    bus.close();

    let err = fan.run(&Shutdown::new(), &mut CollectingSink::new()).unwrap_err();
    assert!(matches!(err, Error::Bus(BusError::Closed)));
    // Drained the queued reading (on), then forced off on exit.
    assert_eq!(fan.output().levels, vec![false, true, false]);
}

#[test]
fn unrelated_topic_does_not_reach_fan() {
    let bus = MemoryBus::new();
    let mut fan = fan_on(&bus, 25.0);
    let mut publisher = SensorPublisher::new(
        ScriptedSensor::thermal(&[40.0]),
        bus.clone(),
        CountingDelay::unbounded(),
        Topic::sensor("humidity2").unwrap(),
        PublisherConfig::default(),
    );
    publisher.poll_once(&mut CollectingSink::new()).unwrap();
    assert_eq!(fan.step(&mut CollectingSink::new()).unwrap(), None);
    assert_eq!(fan.state(), ActuatorState::Off);
}

/// ADC returning a fixed mid-scale conversion.
struct MidScale;

impl AnalogInput for MidScale {
    fn read(&mut self) -> Result<AnalogSample, SensorError> {
        Ok(AnalogSample {
            raw: 16_384,
            voltage: envmesh::sensors::ads1115::raw_to_voltage(16_384),
        })
    }
}

#[test]
fn moisture_reading_reaches_subscribers_and_sensor_powers_down() {
    let bus = MemoryBus::new();
    let topic = Topic::sensor("soil").unwrap();
    let mut sub = bus.subscribe(topic.clone());

    let moisture = MoistureConfig::default();
    let sensor = MoistureSensor::new(
        RecordingPin::new(),
        MidScale,
        CountingDelay::unbounded(),
        &moisture,
    )
    .unwrap();
    let mut publisher = SensorPublisher::new(
        sensor,
        bus.clone(),
        CountingDelay::unbounded(),
        topic,
        moisture.publisher(),
    );
    publisher.poll_once(&mut CollectingSink::new()).unwrap();

    let payload = sub.next_message().unwrap().unwrap();
    let Reading::Moisture(MoistureReading { value, voltage }) = Reading::from_json(&payload).unwrap()
    else {
        panic!("expected a moisture reading");
    };
    assert_eq!(value, 16_384);
    assert!((voltage - 2.048).abs() < 1e-3);

    let (sensor, _, _) = publisher.into_parts();
    assert!(!sensor.enable_line().is_high());
    assert_eq!(sensor.enable_line().levels, vec![false, true, false]);
}
