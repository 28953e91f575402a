//! Serial port byte source

use crate::{BridgeError, BridgeResult};
use serialport::SerialPort;
use serwheel_protocol::{ByteSource, IoSource, SourceError};
use std::time::Duration;
use tracing::info;

/// An open serial port read one byte at a time.
///
/// The port is closed when this value is dropped, whichever way the bridge
/// exits.
pub struct SerialSource {
    name: String,
    inner: IoSource<Box<dyn SerialPort>>,
}

impl SerialSource {
    pub fn open(name: &str, baud_rate: u32, timeout: Duration) -> BridgeResult<Self> {
        let port = serialport::new(name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|source| BridgeError::SerialOpen {
                port: name.to_string(),
                source,
            })?;
        info!("Opened {} at {} baud", name, baud_rate);
        Ok(Self {
            name: name.to_string(),
            inner: IoSource::new(port),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ByteSource for SerialSource {
    fn read_byte(&mut self) -> Result<Option<u8>, SourceError> {
        self.inner.read_byte()
    }
}

impl std::fmt::Debug for SerialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Drop for SerialSource {
    fn drop(&mut self) {
        info!("Released serial port {}", self.name);
    }
}
