//! Event sink and delay seams

use crate::{Axis, Button, DeviceEvent, SinkResult, Step};
use std::time::Duration;

/// A virtual input device.
pub trait EventSink {
    fn set_axis(&mut self, axis: Axis, value: i32) -> SinkResult<()>;

    fn set_button(&mut self, button: Button, pressed: bool) -> SinkResult<()>;

    /// Publish everything written since the last flush as one batch.
    fn flush(&mut self) -> SinkResult<()>;

    fn emit(&mut self, event: DeviceEvent) -> SinkResult<()> {
        match event {
            DeviceEvent::Axis { axis, value } => self.set_axis(axis, value),
            DeviceEvent::Button { button, pressed } => self.set_button(button, pressed),
            DeviceEvent::Sync => self.flush(),
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn set_axis(&mut self, axis: Axis, value: i32) -> SinkResult<()> {
        (**self).set_axis(axis, value)
    }

    fn set_button(&mut self, button: Button, pressed: bool) -> SinkResult<()> {
        (**self).set_button(button, pressed)
    }

    fn flush(&mut self) -> SinkResult<()> {
        (**self).flush()
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn set_axis(&mut self, axis: Axis, value: i32) -> SinkResult<()> {
        (**self).set_axis(axis, value)
    }

    fn set_button(&mut self, button: Button, pressed: bool) -> SinkResult<()> {
        (**self).set_button(button, pressed)
    }

    fn flush(&mut self) -> SinkResult<()> {
        (**self).flush()
    }
}

/// Blocking pause between steps.
pub trait Delay {
    fn wait(&mut self, duration: Duration);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration);
    }
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Drive `steps` into `sink` in order. Stops at the first sink error.
pub fn apply<S, D>(steps: &[Step], sink: &mut S, delay: &mut D) -> SinkResult<()>
where
    S: EventSink + ?Sized,
    D: Delay + ?Sized,
{
    for step in steps {
        match *step {
            Step::Emit(event) => sink.emit(event)?,
            Step::Wait(duration) => delay.wait(duration),
        }
    }
    Ok(())
}

pub mod mock {
    use super::*;
    use crate::SinkError;

    /// Records every event; optionally fails after a number of writes.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Vec<DeviceEvent>,
        fail_after: Option<usize>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Accept `writes` events, then report the device as disconnected.
        pub fn failing_after(writes: usize) -> Self {
            Self {
                events: Vec::new(),
                fail_after: Some(writes),
            }
        }

        pub fn events(&self) -> &[DeviceEvent] {
            &self.events
        }

        pub fn sync_count(&self) -> usize {
            self.events
                .iter()
                .filter(|event| matches!(event, DeviceEvent::Sync))
                .count()
        }

        /// Events other than sync markers.
        pub fn state_events(&self) -> Vec<DeviceEvent> {
            self.events
                .iter()
                .copied()
                .filter(|event| !matches!(event, DeviceEvent::Sync))
                .collect()
        }

        pub fn clear(&mut self) {
            self.events.clear();
        }

        fn record(&mut self, event: DeviceEvent) -> SinkResult<()> {
            if self.fail_after.is_some_and(|limit| self.events.len() >= limit) {
                return Err(SinkError::Disconnected);
            }
            self.events.push(event);
            Ok(())
        }
    }

    impl EventSink for RecordingSink {
        fn set_axis(&mut self, axis: Axis, value: i32) -> SinkResult<()> {
            self.record(DeviceEvent::Axis { axis, value })
        }

        fn set_button(&mut self, button: Button, pressed: bool) -> SinkResult<()> {
            self.record(DeviceEvent::Button { button, pressed })
        }

        fn flush(&mut self) -> SinkResult<()> {
            self.record(DeviceEvent::Sync)
        }
    }

    /// Records requested waits without sleeping.
    #[derive(Debug, Default)]
    pub struct RecordingDelay {
        waits: Vec<Duration>,
    }

    impl RecordingDelay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn waits(&self) -> &[Duration] {
            &self.waits
        }

        pub fn total(&self) -> Duration {
            self.waits.iter().sum()
        }
    }

    impl Delay for RecordingDelay {
        fn wait(&mut self, duration: Duration) {
            self.waits.push(duration);
        }
    }
}
