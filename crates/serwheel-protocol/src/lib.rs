//! UART protocol implementation for the serwheel steering wheel peripheral
//!
//! The peripheral streams fixed 4-byte packets over a serial link:
//!
//! ```text
//! [type: u8][value_lo: u8][value_hi: u8][0xFF]
//! ```
//!
//! This crate decodes that stream. It has no I/O of its own; bytes come from
//! any [`ByteSource`].
//!
//! ## Features
//! - Sensor ID table from the firmware contract
//! - Packet parsing and encoding
//! - Terminator-based resynchronizing [`Framer`]
//! - Lazy [`Packets`] iterator over a byte source

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod framer;
pub mod packet;
pub mod source;
pub mod types;

pub use framer::*;
pub use packet::*;
pub use source::*;
pub use types::*;

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Missing packet terminator: got {0:#04x}")]
    MissingTerminator(u8),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Bytes per packet on the wire, terminator included.
pub const PACKET_LEN: usize = 4;

/// End-of-packet marker, also the resynchronization point.
pub const TERMINATOR: u8 = 0xFF;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
