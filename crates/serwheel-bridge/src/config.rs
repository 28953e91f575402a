//! Runtime configuration
//!
//! Everything comes from command-line arguments or their environment
//! fallbacks; there is no configuration file.

use crate::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use serwheel_mapper::MapperConfig;
use serwheel_protocol::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
use std::time::Duration;

/// Name the virtual gamepad registers under.
pub const DEFAULT_DEVICE_NAME: &str = "Volante ETS2";

/// Device node prefixes tried during discovery, in priority order.
pub const DEFAULT_PORT_PREFIXES: [&str; 2] = ["/dev/ttyACM", "/dev/ttyUSB"];

/// Longest device name uinput accepts, excluding the NUL.
pub const MAX_DEVICE_NAME_LEN: usize = 79;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Explicit serial device; discovery runs when unset.
    pub port: Option<String>,
    pub port_prefixes: Vec<String>,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub pulse_dwell_ms: u64,
    pub device_name: String,
    /// Log events instead of creating a virtual device.
    pub dry_run: bool,
    /// Seconds between framer statistics reports; 0 disables them.
    pub stats_interval_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: None,
            port_prefixes: DEFAULT_PORT_PREFIXES.iter().map(|p| p.to_string()).collect(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT.as_millis() as u64,
            pulse_dwell_ms: serwheel_mapper::DEFAULT_PULSE_DWELL.as_millis() as u64,
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            dry_run: false,
            stats_interval_secs: 0,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> BridgeResult<()> {
        if self.baud_rate == 0 {
            return Err(BridgeError::InvalidConfiguration(
                "baud rate must be positive".to_string(),
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(BridgeError::InvalidConfiguration(
                "read timeout must be positive".to_string(),
            ));
        }
        if self.port.as_deref().is_some_and(str::is_empty) {
            return Err(BridgeError::InvalidConfiguration(
                "port must not be empty".to_string(),
            ));
        }
        if self.port.is_none() && self.port_prefixes.iter().all(|p| p.is_empty()) {
            return Err(BridgeError::InvalidConfiguration(
                "no port given and no discovery prefixes configured".to_string(),
            ));
        }
        if self.device_name.is_empty() || self.device_name.len() > MAX_DEVICE_NAME_LEN {
            return Err(BridgeError::InvalidConfiguration(format!(
                "device name must be 1..={MAX_DEVICE_NAME_LEN} bytes, got {}",
                self.device_name.len()
            )));
        }
        if self.device_name.contains('\0') {
            return Err(BridgeError::InvalidConfiguration(
                "device name must not contain NUL".to_string(),
            ));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn pulse_dwell(&self) -> Duration {
        Duration::from_millis(self.pulse_dwell_ms)
    }

    /// `None` when periodic statistics are disabled.
    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_secs > 0).then(|| Duration::from_secs(self.stats_interval_secs))
    }

    pub fn mapper_config(&self) -> MapperConfig {
        MapperConfig {
            pulse_dwell: self.pulse_dwell(),
        }
    }
}
