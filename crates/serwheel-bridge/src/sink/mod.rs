//! Virtual device sinks

mod trace;
#[cfg(target_os = "linux")]
mod uinput;

pub use trace::TraceSink;
#[cfg(target_os = "linux")]
pub use uinput::UinputSink;

use crate::{BridgeConfig, BridgeResult};
use serwheel_mapper::EventSink;
use tracing::info;

/// Build the sink the configuration asks for.
///
/// Hosts without uinput always get a [`TraceSink`].
pub fn open_sink(config: &BridgeConfig) -> BridgeResult<Box<dyn EventSink>> {
    if config.dry_run {
        info!("Dry run: logging events instead of creating a device");
        return Ok(Box::new(TraceSink::new()));
    }

    #[cfg(target_os = "linux")]
    {
        let sink = UinputSink::create(&config.device_name)?;
        Ok(Box::new(sink))
    }

    #[cfg(not(target_os = "linux"))]
    {
        tracing::warn!("Virtual devices need Linux uinput; logging events instead");
        Ok(Box::new(TraceSink::new()))
    }
}
