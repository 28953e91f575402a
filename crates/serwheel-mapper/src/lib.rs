//! Sensor-to-event mapping for the serwheel steering wheel
//!
//! Turns decoded [`Packet`](serwheel_protocol::Packet)s into virtual gamepad
//! events:
//!
//! - **Steering**: encoder position 0..=100 mapped to -450..=450, smoothed
//!   over the last five readings
//! - **Pedals**: 12-bit ADC readings scaled to 0..=1023
//! - **Buttons**: every firmware event becomes a momentary press/release pulse
//!
//! The mapper itself never touches a device. It produces a [`Mapping`] whose
//! [`Step`]s are driven into an [`EventSink`] by [`apply`], with the press
//! dwell handed to a [`Delay`] so the blocking pause stays explicit.
//!
//! # Example
//!
//! ```
//! use serwheel_mapper::{DeviceEvent, Mapper, mock::{RecordingDelay, RecordingSink}};
//! use serwheel_protocol::{Packet, SensorId};
//!
//! let mut mapper = Mapper::default();
//! let mut sink = RecordingSink::new();
//! let mut delay = RecordingDelay::new();
//!
//! mapper.process(&Packet::from_sensor(SensorId::Steering, 50), &mut sink, &mut delay)?;
//! assert_eq!(sink.events().last(), Some(&DeviceEvent::Sync));
//! # Ok::<(), serwheel_mapper::SinkError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_debug_implementations)]

pub mod axis;
pub mod mapper;
pub mod sink;
pub mod smoothing;

pub use axis::*;
pub use mapper::*;
pub use sink::*;
pub use smoothing::*;

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write event")]
    Io(#[from] std::io::Error),

    #[error("Virtual device disconnected")]
    Disconnected,
}

pub type SinkResult<T> = Result<T, SinkError>;

/// Readings averaged for the steering axis.
pub const STEERING_WINDOW: usize = 5;

/// Time a momentary button is held down before release.
pub const DEFAULT_PULSE_DWELL: Duration = Duration::from_millis(50);
