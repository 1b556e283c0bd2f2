//! Integration tests for the threshold actuator loop.

use envmesh::Shutdown;
use envmesh::app::actuator::{ActuatorState, Handled, ThresholdActuator};
use envmesh::app::events::{AppEvent, Role, SkipReason};
use envmesh::config::{ActuatorConfig, FAN_TOPIC};
use envmesh::error::{BusError, Error, HardwareError};

use crate::mock_hw::{
    CollectingSink, CountingDelay, Journal, JournalPin, RecordingPin, ScriptedSubscriber, StuckLowPin,
};

fn config(threshold: f64) -> ActuatorConfig {
    ActuatorConfig {
        threshold,
        ..ActuatorConfig::default()
    }
}

fn fan(
    payloads: &[&str],
    shutdown: &Shutdown,
) -> ThresholdActuator<RecordingPin, ScriptedSubscriber, CountingDelay> {
    ThresholdActuator::new(
        RecordingPin::new(),
        ScriptedSubscriber::new(FAN_TOPIC, payloads, shutdown),
        CountingDelay::unbounded(),
        config(25.0),
    )
    .unwrap()
}

#[test]
fn construction_drives_output_low() {
    let shutdown = Shutdown::new();
    let f = fan(&[], &shutdown);
    assert_eq!(f.output().levels, vec![false]);
    assert_eq!(f.state(), ActuatorState::Off);
}

#[test]
fn hot_reading_turns_fan_on() {
    let shutdown = Shutdown::new();
    let mut f = fan(&[], &shutdown);
    let mut sink = CollectingSink::new();
    let handled = f
        .handle(br#"{"temperature_c": 30, "humidity": 40}"#, &mut sink)
        .unwrap();
    assert_eq!(
        handled,
        Handled::Actuated {
            value: 30.0,
            state: ActuatorState::On
        }
    );
    assert!(f.output().is_high());
}

#[test]
fn threshold_value_itself_turns_fan_on() {
    let shutdown = Shutdown::new();
    let mut f = fan(&[], &shutdown);
    f.handle(br#"{"temperature_c": 25.0, "humidity": 40}"#, &mut CollectingSink::new())
        .unwrap();
    assert_eq!(f.state(), ActuatorState::On);
}

#[test]
fn null_temperature_leaves_fan_as_it_was() {
    let shutdown = Shutdown::new();
    let mut f = fan(&[], &shutdown);
    let mut sink = CollectingSink::new();
    f.handle(br#"{"temperature_c": 30, "humidity": 40}"#, &mut sink)
        .unwrap();
    let writes = f.output().levels.len();

    let handled = f
        .handle(br#"{"temperature_c": null, "humidity": 40}"#, &mut sink)
        .unwrap();
    assert_eq!(handled, Handled::Skipped);
    assert_eq!(f.state(), ActuatorState::On);
    assert_eq!(f.output().levels.len(), writes, "no pin write on null");
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::MessageSkipped(SkipReason::NoValue))
    );
}

#[test]
fn malformed_payloads_are_skipped() {
    let shutdown = Shutdown::new();
    let mut f = fan(&[], &shutdown);
    let mut sink = CollectingSink::new();
    for payload in [&b"garbage"[..], b"[]", br#"{"humidity": 40}"#, br#"{"temperature_c": "hot"}"#] {
        assert_eq!(f.handle(payload, &mut sink).unwrap(), Handled::Skipped);
    }
    assert_eq!(f.state(), ActuatorState::Off);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::MessageSkipped(SkipReason::Malformed(_)))),
        4
    );
}

#[test]
fn run_follows_readings_and_ends_off() {
    let shutdown = Shutdown::new();
    let mut f = ThresholdActuator::new(
        RecordingPin::new(),
        ScriptedSubscriber::new(
            FAN_TOPIC,
            &[
                r#"{"temperature_c": 30, "humidity": 40}"#,
                r#"{"temperature_c": null, "humidity": 40}"#,
                r#"{"temperature_c": 20, "humidity": 40}"#,
                r#"{"temperature_c": 26.5, "humidity": 40}"#,
            ],
            &shutdown,
        ),
        CountingDelay::unbounded(),
        config(25.0),
    )
    .unwrap();
    let mut sink = CollectingSink::new();
    f.run(&shutdown, &mut sink).unwrap();

    // init low, on, off, on, shutdown low
    assert_eq!(f.output().levels, vec![false, true, false, true, false]);
    assert_eq!(f.state(), ActuatorState::Off);

    let transitions: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Actuated { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (ActuatorState::Off, ActuatorState::On),
            (ActuatorState::On, ActuatorState::Off),
            (ActuatorState::Off, ActuatorState::On),
        ]
    );
    assert_eq!(
        sink.events.first(),
        Some(&AppEvent::Started {
            role: Role::Actuator,
            topic: FAN_TOPIC.into()
        })
    );
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::Stopped {
            role: Role::Actuator
        })
    );
}

#[test]
fn pacing_follows_actuation_only() {
    let shutdown = Shutdown::new();
    let mut f = ThresholdActuator::new(
        RecordingPin::new(),
        ScriptedSubscriber::new(
            FAN_TOPIC,
            &[
                r#"{"temperature_c": 30, "humidity": 40}"#,
                "garbage",
                r#"{"temperature_c": null, "humidity": 40}"#,
            ],
            &shutdown,
        ),
        CountingDelay::unbounded(),
        config(25.0),
    )
    .unwrap();
    assert!(f.step(&mut CollectingSink::new()).unwrap().is_some());
    assert!(f.step(&mut CollectingSink::new()).unwrap().is_some());
    assert!(f.step(&mut CollectingSink::new()).unwrap().is_some());
    assert_eq!(f.step(&mut CollectingSink::new()).unwrap(), None);
    assert!(shutdown.is_requested());

    let (_, _, delay) = f.into_parts();
    assert_eq!(delay.sleeps_ms, vec![1000]);
}

#[test]
fn output_failure_is_fatal() {
    let shutdown = Shutdown::new();
    let mut f = ThresholdActuator::new(
        StuckLowPin,
        ScriptedSubscriber::new(FAN_TOPIC, &[r#"{"temperature_c": 40, "humidity": 40}"#], &shutdown),
        CountingDelay::unbounded(),
        config(25.0),
    )
    .unwrap();
    let err = f.run(&shutdown, &mut CollectingSink::new()).unwrap_err();
    assert!(matches!(err, Error::Hardware(HardwareError::Output(_))));
    assert_eq!(f.state(), ActuatorState::Off);
}

#[test]
fn open_switches_output_off_before_subscribing() {
    let shutdown = Shutdown::new();
    let journal = Journal::default();
    let mut conn = Journal::clone(&journal);
    let f = ThresholdActuator::open(
        JournalPin(Journal::clone(&journal)),
        &mut conn,
        |conn| {
            conn.borrow_mut().push("subscribe");
            Ok(ScriptedSubscriber::new(FAN_TOPIC, &[], &shutdown))
        },
        CountingDelay::unbounded(),
        config(25.0),
    )
    .unwrap();
    assert_eq!(*journal.borrow(), vec!["low", "subscribe"]);
    assert_eq!(f.state(), ActuatorState::Off);
}

#[test]
fn failed_subscribe_leaves_output_off() {
    let journal = Journal::default();
    let mut conn = ();
    let result = ThresholdActuator::<_, ScriptedSubscriber, _>::open(
        JournalPin(Journal::clone(&journal)),
        &mut conn,
        |_| Err(BusError::Closed),
        CountingDelay::unbounded(),
        config(25.0),
    );
    assert!(matches!(result, Err(Error::Bus(BusError::Closed))));
    assert_eq!(*journal.borrow(), vec!["low"]);
}
