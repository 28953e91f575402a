//! serwheel - steering wheel serial bridge
//!
//! Reads the wheel's UART stream and republishes it as a virtual gamepad.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use clap::Parser;
use serwheel_bridge::{
    BridgeConfig, BridgeError, DEFAULT_DEVICE_NAME, Pipeline, PipelineExit, SerialSource,
    discovery, sink,
};
use serwheel_mapper::ThreadDelay;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "serwheel")]
#[command(about = "Bridge a UART steering wheel to a virtual gamepad")]
#[command(version)]
struct Cli {
    /// Serial device to open; discovered when omitted
    #[arg(short, long, env = "SERWHEEL_PORT")]
    port: Option<String>,

    /// Device prefixes tried during discovery, in order
    #[arg(
        long = "port-prefix",
        env = "SERWHEEL_PORT_PREFIXES",
        value_delimiter = ',',
        default_values_t = ["/dev/ttyACM".to_string(), "/dev/ttyUSB".to_string()]
    )]
    port_prefixes: Vec<String>,

    /// Serial baud rate
    #[arg(short, long, env = "SERWHEEL_BAUD", default_value_t = serwheel_protocol::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Serial read timeout in milliseconds
    #[arg(long, env = "SERWHEEL_TIMEOUT_MS", default_value_t = 1000)]
    timeout_ms: u64,

    /// How long a button pulse holds the press, in milliseconds
    #[arg(long, env = "SERWHEEL_PULSE_MS", default_value_t = 50)]
    pulse_ms: u64,

    /// Name of the virtual gamepad
    #[arg(long, env = "SERWHEEL_DEVICE_NAME", default_value = DEFAULT_DEVICE_NAME)]
    device_name: String,

    /// Log events instead of creating a virtual device
    #[arg(long, env = "SERWHEEL_DRY_RUN")]
    dry_run: bool,

    /// Seconds between statistics reports (0 disables)
    #[arg(long, env = "SERWHEEL_STATS_INTERVAL", default_value_t = 0)]
    stats_interval: u64,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> BridgeConfig {
        BridgeConfig {
            port: self.port.clone(),
            port_prefixes: self.port_prefixes.clone(),
            baud_rate: self.baud,
            read_timeout_ms: self.timeout_ms,
            pulse_dwell_ms: self.pulse_ms,
            device_name: self.device_name.clone(),
            dry_run: self.dry_run,
            stats_interval_secs: self.stats_interval,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "serwheel={log_level},serwheel_bridge={log_level},\
                     serwheel_mapper={log_level},serwheel_protocol={log_level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e.downcast_ref::<BridgeError>().map_or(1, BridgeError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    config.validate()?;
    debug!("Configuration: {}", serde_json::to_string(&config)?);

    let sink = sink::open_sink(&config)?;

    let port = match &config.port {
        Some(port) => port.clone(),
        None => discovery::find_port(&config.port_prefixes)?,
    };

    let source = SerialSource::open(&port, config.baud_rate, config.read_timeout())?;

    let outcome = Pipeline::new(source, sink, ThreadDelay, config.mapper_config())
        .with_stats_interval(config.stats_interval())
        .run()?;

    match outcome.exit {
        PipelineExit::SourceFailed(e) => error!("Serial error on {}: {}", port, e),
    }
    info!("Bridge stopped after {} packets", outcome.stats.framer.packets);
    Ok(())
}
