//! Error types for the serwheel bridge
//!
//! Messages leave the underlying cause to the error chain; log them with
//! `{:#}` to see it.

use serwheel_mapper::SinkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("No serial port found matching {prefixes:?}")]
    NoSerialPort { prefixes: Vec<String> },

    #[error("Serial port enumeration failed")]
    Enumeration(#[source] serialport::Error),

    #[error("Failed to open serial port {port}")]
    SerialOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to create virtual device")]
    DeviceCreate(#[source] std::io::Error),

    #[error("Virtual device error")]
    Sink(#[from] SinkError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl BridgeError {
    /// Process exit status for this failure.
    ///
    /// Only startup failures before the serial session exit non-zero. A port
    /// that fails to open or a device write that fails mid-session is
    /// reported and shuts the bridge down normally.
    pub fn exit_code(&self) -> u8 {
        match self {
            BridgeError::NoSerialPort { .. }
            | BridgeError::Enumeration(_)
            | BridgeError::DeviceCreate(_) => 1,
            BridgeError::SerialOpen { .. } | BridgeError::Sink(_) => 0,
            BridgeError::InvalidConfiguration(_) => 2,
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_errors_exit_one() {
        let errors = [
            BridgeError::NoSerialPort {
                prefixes: vec!["/dev/ttyACM".to_string()],
            },
            BridgeError::Enumeration(serialport::Error::new(
                serialport::ErrorKind::Unknown,
                "sysfs unreadable",
            )),
            BridgeError::DeviceCreate(std::io::Error::other("permission denied")),
        ];
        for error in &errors {
            assert_eq!(error.exit_code(), 1, "{error}");
        }
    }

    #[test]
    fn test_session_errors_exit_zero() {
        let open = BridgeError::SerialOpen {
            port: "/dev/ttyACM9".to_string(),
            source: serialport::Error::new(
                serialport::ErrorKind::NoDevice,
                "No such file or directory",
            ),
        };
        assert_eq!(open.exit_code(), 0);
        assert_eq!(BridgeError::Sink(SinkError::Disconnected).exit_code(), 0);
    }

    #[test]
    fn test_cause_reported_once() {
        let error = anyhow::Error::from(BridgeError::SerialOpen {
            port: "/dev/ttyACM9".to_string(),
            source: serialport::Error::new(
                serialport::ErrorKind::NoDevice,
                "No such file or directory",
            ),
        });
        let rendered = format!("{error:#}");
        assert!(rendered.starts_with("Failed to open serial port /dev/ttyACM9: "));
        assert_eq!(rendered.matches("No such file or directory").count(), 1);

        let error = anyhow::Error::from(BridgeError::Sink(SinkError::Io(
            std::io::Error::other("device gone"),
        )));
        assert_eq!(
            format!("{error:#}"),
            "Virtual device error: Failed to write event: device gone"
        );
    }

    #[test]
    fn test_no_port_message_names_prefixes() {
        let error = BridgeError::NoSerialPort {
            prefixes: vec!["/dev/ttyACM".to_string(), "/dev/ttyUSB".to_string()],
        };
        assert_eq!(
            error.to_string(),
            r#"No serial port found matching ["/dev/ttyACM", "/dev/ttyUSB"]"#
        );
    }
}
