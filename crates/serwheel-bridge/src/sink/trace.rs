//! Logging-only sink

use serwheel_mapper::{Axis, Button, DeviceEvent, EventSink, SinkResult};
use tracing::info;

/// Logs every synced frame instead of driving a device.
#[derive(Debug, Default)]
pub struct TraceSink {
    pending: Vec<DeviceEvent>,
    frames: u64,
}

impl TraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flushes so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Events written since the last flush.
    pub fn pending(&self) -> &[DeviceEvent] {
        &self.pending
    }
}

impl EventSink for TraceSink {
    fn set_axis(&mut self, axis: Axis, value: i32) -> SinkResult<()> {
        self.pending.push(DeviceEvent::Axis { axis, value });
        Ok(())
    }

    fn set_button(&mut self, button: Button, pressed: bool) -> SinkResult<()> {
        self.pending.push(DeviceEvent::Button { button, pressed });
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.frames = self.frames.saturating_add(1);
        let rendered: Vec<String> = self
            .pending
            .drain(..)
            .map(|event| match event {
                DeviceEvent::Axis { axis, value } => format!("{axis:?}={value}"),
                DeviceEvent::Button { button, pressed } => {
                    format!("{button:?}={}", if pressed { "down" } else { "up" })
                }
                DeviceEvent::Sync => "sync".to_string(),
            })
            .collect();
        info!(frame = self.frames, "[{}]", rendered.join(", "));
        Ok(())
    }
}
