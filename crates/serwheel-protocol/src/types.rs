//! Sensor identifiers defined by the peripheral firmware

use serde::{Deserialize, Serialize};

/// Packet type IDs sent by the wheel firmware.
///
/// The numbering follows the RP2040 pin each input is wired to, which is why
/// the values are sparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SensorId {
    GearUp = 2,
    GearDown = 3,
    Ignition = 4,
    Lights = 5,
    Steering = 15,
    Accel = 26,
    Brake = 27,
}

/// Broad class of a sensor, deciding how its value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    /// Encoder position, raw 0..=100.
    Steering,
    /// 12-bit ADC reading, raw 0..=4095.
    Pedal,
    /// Falling-edge event; the value carries no information.
    Button,
}

impl SensorId {
    pub const ALL: [SensorId; 7] = [
        SensorId::GearUp,
        SensorId::GearDown,
        SensorId::Ignition,
        SensorId::Lights,
        SensorId::Steering,
        SensorId::Accel,
        SensorId::Brake,
    ];

    pub fn from_type(kind: u8) -> Option<Self> {
        match kind {
            2 => Some(SensorId::GearUp),
            3 => Some(SensorId::GearDown),
            4 => Some(SensorId::Ignition),
            5 => Some(SensorId::Lights),
            15 => Some(SensorId::Steering),
            26 => Some(SensorId::Accel),
            27 => Some(SensorId::Brake),
            _ => None,
        }
    }

    pub fn as_type(self) -> u8 {
        self as u8
    }

    pub fn kind(self) -> SensorKind {
        match self {
            SensorId::Steering => SensorKind::Steering,
            SensorId::Accel | SensorId::Brake => SensorKind::Pedal,
            SensorId::GearUp | SensorId::GearDown | SensorId::Ignition | SensorId::Lights => {
                SensorKind::Button
            }
        }
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SensorId::GearUp => "gear-up",
            SensorId::GearDown => "gear-down",
            SensorId::Ignition => "ignition",
            SensorId::Lights => "lights",
            SensorId::Steering => "steering",
            SensorId::Accel => "accel",
            SensorId::Brake => "brake",
        };
        f.write_str(name)
    }
}
