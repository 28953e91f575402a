//! End-to-end pipeline tests with a scripted source and recording sink.

use proptest::prelude::*;
use serwheel_bridge::{BridgeError, Pipeline, PipelineExit};
use serwheel_mapper::mock::{RecordingDelay, RecordingSink};
use serwheel_mapper::{Axis, Button, DeviceEvent, MapperConfig};
use serwheel_protocol::mock::ScriptedSource;
use serwheel_protocol::{Packet, SensorId, SourceError};
use std::io;
use std::sync::atomic::Ordering;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn pipeline<'a>(
    source: ScriptedSource,
    sink: &'a mut RecordingSink,
    delay: &'a mut RecordingDelay,
) -> Pipeline<ScriptedSource, &'a mut RecordingSink, &'a mut RecordingDelay> {
    Pipeline::new(source, sink, delay, MapperConfig::default())
}

#[test]
fn corrupted_prefix_yields_one_centered_steering_frame() -> TestResult {
    let source = ScriptedSource::from_bytes(&[0x01, 0x02, 0xFF, 15, 50, 0, 0xFF]);
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::new();

    let outcome = pipeline(source, &mut sink, &mut delay).run()?;

    assert!(matches!(
        outcome.exit,
        PipelineExit::SourceFailed(SourceError::Closed)
    ));
    assert_eq!(
        sink.events(),
        &[
            DeviceEvent::Axis {
                axis: Axis::Steering,
                value: 0
            },
            DeviceEvent::Sync
        ]
    );
    assert_eq!(outcome.stats.framer.packets, 1);
    Ok(())
}

#[test]
fn one_flush_per_axis_packet() -> TestResult {
    let source = ScriptedSource::new()
        .packet(Packet::from_sensor(SensorId::Steering, 0))
        .packet(Packet::from_sensor(SensorId::Accel, 4095))
        .packet(Packet::from_sensor(SensorId::Brake, 2048))
        .packet(Packet::new(42, 0));
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::new();

    pipeline(source, &mut sink, &mut delay).run()?;

    assert_eq!(sink.sync_count(), 4);
    assert_eq!(
        sink.state_events(),
        vec![
            DeviceEvent::Axis {
                axis: Axis::Steering,
                value: -450
            },
            DeviceEvent::Axis {
                axis: Axis::Accelerator,
                value: 1023
            },
            DeviceEvent::Axis {
                axis: Axis::Brake,
                value: 511
            },
        ]
    );
    Ok(())
}

#[test]
fn button_pulses_wait_between_press_and_release() -> TestResult {
    let source = ScriptedSource::new()
        .packet(Packet::from_sensor(SensorId::GearDown, 1))
        .packet(Packet::from_sensor(SensorId::Ignition, 1));
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::new();

    let outcome = pipeline(source, &mut sink, &mut delay).run()?;

    assert_eq!(outcome.stats.pulses, 2);
    assert_eq!(delay.waits().len(), 2);
    let presses: Vec<(Button, bool)> = sink
        .state_events()
        .into_iter()
        .filter_map(|event| match event {
            DeviceEvent::Button { button, pressed } => Some((button, pressed)),
            _ => None,
        })
        .collect();
    assert_eq!(
        presses,
        vec![
            (Button::GearDown, true),
            (Button::GearDown, false),
            (Button::Ignition, true),
            (Button::Ignition, false),
        ]
    );
    Ok(())
}

#[test]
fn timeouts_produce_nothing() -> TestResult {
    let source = ScriptedSource::new().timeout().timeout().timeout();
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::new();

    let outcome = pipeline(source, &mut sink, &mut delay).run()?;

    assert!(sink.events().is_empty());
    assert_eq!(outcome.stats.framer.timeouts, 3);
    assert_eq!(outcome.stats.framer.packets, 0);
    Ok(())
}

#[test]
fn serial_error_ends_run_normally() -> TestResult {
    let source = ScriptedSource::new()
        .packet(Packet::from_sensor(SensorId::Steering, 50))
        .fail(io::ErrorKind::BrokenPipe)
        .packet(Packet::from_sensor(SensorId::Steering, 100));
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::new();

    let outcome = pipeline(source, &mut sink, &mut delay).run()?;

    let PipelineExit::SourceFailed(SourceError::Io(error)) = outcome.exit else {
        return Err("expected an I/O failure".into());
    };
    assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    // Nothing after the failure is read.
    assert_eq!(sink.sync_count(), 1);
    Ok(())
}

#[test]
fn source_released_when_run_returns() -> TestResult {
    let source = ScriptedSource::new().packet(Packet::from_sensor(SensorId::Lights, 0));
    let released = source.release_flag();
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::new();

    let runner = pipeline(source, &mut sink, &mut delay);
    assert!(!released.load(Ordering::SeqCst));
    runner.run()?;

    assert!(released.load(Ordering::SeqCst));
    Ok(())
}

#[test]
fn sink_failure_stops_pipeline_and_releases_source() -> TestResult {
    let source = ScriptedSource::new()
        .packet(Packet::from_sensor(SensorId::Steering, 50))
        .packet(Packet::from_sensor(SensorId::Steering, 50));
    let released = source.release_flag();
    let mut sink = RecordingSink::failing_after(2);
    let mut delay = RecordingDelay::new();

    let result = pipeline(source, &mut sink, &mut delay).run();

    let Err(error) = result else {
        return Err("sink failure should stop the pipeline".into());
    };
    assert!(matches!(error, BridgeError::Sink(_)));
    // Reported, then a normal shutdown.
    assert_eq!(error.exit_code(), 0);
    assert!(released.load(Ordering::SeqCst));
    assert_eq!(sink.events().len(), 2);
    Ok(())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// Garbage without a terminator never changes what a packet maps to.
    #[test]
    fn prop_garbage_prefix_does_not_change_output(
        garbage in proptest::collection::vec(0u8..0xFF, 0..64),
        // A value byte equal to the terminator would misframe after garbage.
        raw in (0u16..=4095).prop_filter("no terminator byte", |r| r & 0xFF != 0xFF),
    ) {
        let source = ScriptedSource::from_bytes(&garbage)
            .packet(Packet::from_sensor(SensorId::Brake, raw));
        let mut sink = RecordingSink::new();
        let mut delay = RecordingDelay::new();

        let outcome = pipeline(source, &mut sink, &mut delay).run();
        prop_assert!(outcome.is_ok());

        let expected = serwheel_mapper::scale_pedal(raw);
        prop_assert_eq!(
            sink.events(),
            &[DeviceEvent::Axis { axis: Axis::Brake, value: expected }, DeviceEvent::Sync]
        );
    }
}
