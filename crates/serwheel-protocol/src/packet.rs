//! Packet parsing and encoding

use super::{PACKET_LEN, ProtocolError, ProtocolResult, SensorId, TERMINATOR};
use serde::{Deserialize, Serialize};

/// One decoded wire packet.
///
/// `kind` is kept as the raw type byte so unknown types survive decoding and
/// can be ignored further down the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Packet {
    pub kind: u8,
    pub value: u16,
}

impl Packet {
    pub fn new(kind: u8, value: u16) -> Self {
        Self { kind, value }
    }

    pub fn from_sensor(sensor: SensorId, value: u16) -> Self {
        Self::new(sensor.as_type(), value)
    }

    /// Parse a 4-byte candidate frame.
    pub fn parse(data: &[u8]) -> ProtocolResult<Self> {
        let Ok([kind, lo, hi, terminator]) = <[u8; PACKET_LEN]>::try_from(data) else {
            return Err(ProtocolError::InvalidLength {
                expected: PACKET_LEN,
                actual: data.len(),
            });
        };

        if terminator != TERMINATOR {
            return Err(ProtocolError::MissingTerminator(terminator));
        }

        Ok(Self {
            kind,
            value: u16::from_le_bytes([lo, hi]),
        })
    }

    pub fn encode(&self) -> [u8; PACKET_LEN] {
        let [lo, hi] = self.value.to_le_bytes();
        [self.kind, lo, hi, TERMINATOR]
    }

    pub fn sensor(&self) -> Option<SensorId> {
        SensorId::from_type(self.kind)
    }
}
