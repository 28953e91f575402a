//! Serial port discovery

use crate::{BridgeError, BridgeResult};
use tracing::{debug, info};

/// Pick the first port, in sorted order, whose name starts with any of
/// `prefixes`.
pub fn select_port<I, S>(names: I, prefixes: &[String]) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut candidates: Vec<String> = names
        .into_iter()
        .map(Into::into)
        .filter(|name| {
            prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && name.starts_with(prefix.as_str()))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Enumerate the host's serial ports and pick one for the wheel.
pub fn find_port(prefixes: &[String]) -> BridgeResult<String> {
    let ports = serialport::available_ports().map_err(BridgeError::Enumeration)?;
    debug!("Found {} serial ports", ports.len());

    let port = select_port(ports.into_iter().map(|p| p.port_name), prefixes).ok_or_else(
        || BridgeError::NoSerialPort {
            prefixes: prefixes.to_vec(),
        },
    )?;
    info!("Selected serial port {}", port);
    Ok(port)
}
