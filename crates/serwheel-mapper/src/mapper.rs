//! Packet to device-event mapping

use crate::{
    Axis, Button, DEFAULT_PULSE_DWELL, Delay, EventSink, SinkResult, SteeringSmoother, apply,
    scale_pedal, steering_angle,
};
use serde::{Deserialize, Serialize};
use serwheel_protocol::{Packet, SensorId, SensorKind};
use std::time::Duration;
use tracing::{debug, warn};

/// One event written to the virtual device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceEvent {
    Axis { axis: Axis, value: i32 },
    Button { button: Button, pressed: bool },
    /// Makes the events written so far visible as one batch.
    Sync,
}

/// One step of applying a [`Mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Emit(DeviceEvent),
    Wait(Duration),
}

/// What a single packet turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    Axis { axis: Axis, value: i32 },
    /// Press now, release after `dwell`.
    Pulse { button: Button, dwell: Duration },
    /// Unknown packet type; nothing but the sync marker is emitted.
    Ignored { kind: u8 },
}

impl Mapping {
    /// Ordered steps for this mapping, always ending in exactly one sync.
    ///
    /// A pulse syncs after the press as well, so consumers see the button
    /// held for the whole dwell.
    pub fn steps(&self) -> Vec<Step> {
        match *self {
            Mapping::Axis { axis, value } => vec![
                Step::Emit(DeviceEvent::Axis { axis, value }),
                Step::Emit(DeviceEvent::Sync),
            ],
            Mapping::Pulse { button, dwell } => vec![
                Step::Emit(DeviceEvent::Button {
                    button,
                    pressed: true,
                }),
                Step::Emit(DeviceEvent::Sync),
                Step::Wait(dwell),
                Step::Emit(DeviceEvent::Button {
                    button,
                    pressed: false,
                }),
                Step::Emit(DeviceEvent::Sync),
            ],
            Mapping::Ignored { .. } => vec![Step::Emit(DeviceEvent::Sync)],
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Mapping::Ignored { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// How long a momentary button stays pressed.
    pub pulse_dwell: Duration,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            pulse_dwell: DEFAULT_PULSE_DWELL,
        }
    }
}

/// Converts packets into device events. Owns the steering history.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
    steering: SteeringSmoother,
}

impl Mapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            steering: SteeringSmoother::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn steering_history(&self) -> &SteeringSmoother {
        &self.steering
    }

    pub fn map(&mut self, packet: &Packet) -> Mapping {
        let Some(sensor) = packet.sensor() else {
            debug!("Ignoring packet with unknown type {}", packet.kind);
            return Mapping::Ignored { kind: packet.kind };
        };

        match sensor.kind() {
            SensorKind::Steering => {
                let value = self.steering.push(steering_angle(packet.value));
                axis_mapping(Axis::Steering, value, packet.value)
            }
            SensorKind::Pedal => {
                let axis = if sensor == SensorId::Brake {
                    Axis::Brake
                } else {
                    Axis::Accelerator
                };
                axis_mapping(axis, scale_pedal(packet.value), packet.value)
            }
            SensorKind::Button => match Button::from_sensor(sensor) {
                Some(button) => {
                    debug!("Button {} pulse", sensor);
                    Mapping::Pulse {
                        button,
                        dwell: self.config.pulse_dwell,
                    }
                }
                None => Mapping::Ignored { kind: packet.kind },
            },
        }
    }

    /// Map a packet and drive its steps into `sink`.
    pub fn process<S, D>(
        &mut self,
        packet: &Packet,
        sink: &mut S,
        delay: &mut D,
    ) -> SinkResult<Mapping>
    where
        S: EventSink + ?Sized,
        D: Delay + ?Sized,
    {
        let mapping = self.map(packet);
        apply(&mapping.steps(), sink, delay)?;
        Ok(mapping)
    }

    pub fn reset(&mut self) {
        self.steering.reset();
    }
}

fn axis_mapping(axis: Axis, value: i32, raw: u16) -> Mapping {
    if !axis.contains(value) {
        let (min, max) = axis.range();
        warn!(
            "{:?} value {} (raw {}) is outside declared range {}..={}",
            axis, value, raw, min, max
        );
    }
    Mapping::Axis { axis, value }
}
