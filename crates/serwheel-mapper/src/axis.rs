//! Gamepad axes, buttons, and raw value conversion

use serde::{Deserialize, Serialize};
use serwheel_protocol::SensorId;

/// Highest raw steering reading the firmware sends.
pub const STEERING_RAW_MAX: u16 = 100;

/// Steering axis spans -450..=450.
pub const STEERING_HALF_RANGE: i32 = 450;

/// Highest 12-bit ADC reading.
pub const PEDAL_RAW_MAX: u16 = 4095;

/// Pedal axes span 0..=1023.
pub const PEDAL_AXIS_MAX: i32 = 1023;

// Linux input-event codes (linux/input-event-codes.h).
const ABS_X: u16 = 0x00;
const ABS_Y: u16 = 0x01;
const ABS_Z: u16 = 0x02;
const BTN_TRIGGER: u16 = 0x120;
const BTN_THUMB: u16 = 0x121;
const BTN_TOP: u16 = 0x123;
const BTN_PINKIE: u16 = 0x125;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Steering,
    Accelerator,
    Brake,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Steering, Axis::Accelerator, Axis::Brake];

    /// Declared `(min, max)` range of the axis.
    pub fn range(self) -> (i32, i32) {
        match self {
            Axis::Steering => (-STEERING_HALF_RANGE, STEERING_HALF_RANGE),
            Axis::Accelerator | Axis::Brake => (0, PEDAL_AXIS_MAX),
        }
    }

    pub fn contains(self, value: i32) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }

    /// Absolute-axis event code.
    pub fn code(self) -> u16 {
        match self {
            Axis::Steering => ABS_X,
            Axis::Accelerator => ABS_Y,
            Axis::Brake => ABS_Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    GearUp,
    GearDown,
    Ignition,
    Lights,
}

/// Firmware button IDs and the gamepad buttons they drive.
pub const BUTTON_MAP: [(SensorId, Button); 4] = [
    (SensorId::GearUp, Button::GearUp),
    (SensorId::GearDown, Button::GearDown),
    (SensorId::Ignition, Button::Ignition),
    (SensorId::Lights, Button::Lights),
];

impl Button {
    pub const ALL: [Button; 4] = [
        Button::GearUp,
        Button::GearDown,
        Button::Ignition,
        Button::Lights,
    ];

    pub fn from_sensor(sensor: SensorId) -> Option<Self> {
        BUTTON_MAP
            .iter()
            .find(|(id, _)| *id == sensor)
            .map(|&(_, button)| button)
    }

    /// Key event code.
    pub fn code(self) -> u16 {
        match self {
            Button::GearUp => BTN_TRIGGER,
            Button::GearDown => BTN_THUMB,
            Button::Ignition => BTN_TOP,
            Button::Lights => BTN_PINKIE,
        }
    }
}

/// Steering reading 0..=100 to an angle in -450.0..=450.0.
pub fn steering_angle(raw: u16) -> f64 {
    (f64::from(raw) / f64::from(STEERING_RAW_MAX)) * 900.0 - 450.0
}

/// 12-bit pedal reading to 0..=1023, truncated toward zero.
///
/// Readings above [`PEDAL_RAW_MAX`] are not clamped.
pub fn scale_pedal(raw: u16) -> i32 {
    ((f64::from(raw) / f64::from(PEDAL_RAW_MAX)) * f64::from(PEDAL_AXIS_MAX)) as i32
}
