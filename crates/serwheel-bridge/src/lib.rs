//! Serial-to-virtual-gamepad bridge for the serwheel steering wheel
//!
//! Wires a serial [`ByteSource`](serwheel_protocol::ByteSource) through the
//! framer and mapper into an [`EventSink`](serwheel_mapper::EventSink):
//!
//! - [`discovery`]: find the wheel's serial port
//! - [`SerialSource`]: the opened port, released on drop
//! - [`sink`]: uinput gamepad on Linux, tracing sink elsewhere
//! - [`Pipeline`]: the blocking read/frame/map/emit loop

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use config::*;
pub use error::*;
pub use pipeline::*;
pub use source::SerialSource;
