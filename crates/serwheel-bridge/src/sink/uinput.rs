//! Linux uinput virtual gamepad

use crate::{BridgeError, BridgeResult};
use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, UinputAbsSetup};
use serwheel_mapper::{Axis, Button, EventSink, SinkResult};
use tracing::{debug, info};

/// Virtual gamepad with the steering, accelerator and brake axes and the
/// four wheel buttons.
///
/// Writes are buffered; [`flush`](EventSink::flush) emits them together,
/// followed by a single `SYN_REPORT`.
pub struct UinputSink {
    device: VirtualDevice,
    name: String,
    pending: Vec<InputEvent>,
}

impl UinputSink {
    pub fn create(name: &str) -> BridgeResult<Self> {
        let device = build_device(name).map_err(BridgeError::DeviceCreate)?;
        info!("Created virtual device \"{}\"", name);
        Ok(Self {
            device,
            name: name.to_string(),
            pending: Vec::with_capacity(4),
        })
    }
}

fn build_device(name: &str) -> std::io::Result<VirtualDevice> {
    let mut keys = AttributeSet::<Key>::new();
    for button in Button::ALL {
        keys.insert(Key::new(button.code()));
    }

    let mut builder = VirtualDeviceBuilder::new()?.name(name);
    for axis in Axis::ALL {
        let (min, max) = axis.range();
        let setup = UinputAbsSetup::new(
            AbsoluteAxisType(axis.code()),
            AbsInfo::new(0, min, max, 0, 0, 0),
        );
        builder = builder.with_absolute_axis(&setup)?;
    }
    builder.with_keys(&keys)?.build()
}

impl EventSink for UinputSink {
    fn set_axis(&mut self, axis: Axis, value: i32) -> SinkResult<()> {
        self.pending
            .push(InputEvent::new(EventType::ABSOLUTE, axis.code(), value));
        Ok(())
    }

    fn set_button(&mut self, button: Button, pressed: bool) -> SinkResult<()> {
        self.pending
            .push(InputEvent::new(EventType::KEY, button.code(), i32::from(pressed)));
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        // emit() appends the SYN_REPORT itself.
        self.device.emit(&self.pending)?;
        self.pending.clear();
        Ok(())
    }
}

impl std::fmt::Debug for UinputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UinputSink")
            .field("name", &self.name)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl Drop for UinputSink {
    fn drop(&mut self) {
        debug!("Destroying virtual device \"{}\"", self.name);
    }
}
