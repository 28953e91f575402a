//! Read, frame, map and emit loop

use crate::BridgeResult;
use serde::Serialize;
use serwheel_mapper::{Delay, EventSink, Mapper, MapperConfig, Mapping, apply};
use serwheel_protocol::{ByteSource, Framer, FramerStats, Packet, Packets, SourceError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Why [`Pipeline::run`] stopped without a bridge error.
#[derive(Debug)]
pub enum PipelineExit {
    /// The byte source closed or failed; the bridge exits normally.
    SourceFailed(SourceError),
}

/// Pipeline counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub framer: FramerStats,
    /// Packets mapped to an axis update.
    pub axis_updates: u64,
    /// Packets mapped to a button pulse.
    pub pulses: u64,
    /// Packets with an unknown type.
    pub ignored: u64,
}

impl PipelineStats {
    fn record(&mut self, mapping: &Mapping) {
        let counter = match mapping {
            Mapping::Axis { .. } => &mut self.axis_updates,
            Mapping::Pulse { .. } => &mut self.pulses,
            Mapping::Ignored { .. } => &mut self.ignored,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Final state of a finished pipeline.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub exit: PipelineExit,
    pub stats: PipelineStats,
}

/// Single-threaded bridge loop.
///
/// Owns the source, so the port is released as soon as [`run`](Self::run)
/// returns, on success or error.
#[derive(Debug)]
pub struct Pipeline<S, K, D> {
    packets: Packets<S>,
    sink: K,
    delay: D,
    mapper: Mapper,
    stats: PipelineStats,
    stats_interval: Option<Duration>,
}

impl<S, K, D> Pipeline<S, K, D>
where
    S: ByteSource,
    K: EventSink,
    D: Delay,
{
    pub fn new(source: S, sink: K, delay: D, config: MapperConfig) -> Self {
        Self {
            packets: Framer::new().packets(source),
            sink,
            delay,
            mapper: Mapper::new(config),
            stats: PipelineStats::default(),
            stats_interval: None,
        }
    }

    /// Log statistics at this interval while running.
    pub fn with_stats_interval(mut self, interval: Option<Duration>) -> Self {
        self.stats_interval = interval.filter(|i| !i.is_zero());
        self
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            framer: self.packets.framer().stats(),
            ..self.stats
        }
    }

    /// Handle one decoded packet.
    pub fn handle_packet(&mut self, packet: &Packet) -> BridgeResult<Mapping> {
        let mapping = self.mapper.map(packet);
        debug!("{:?} -> {:?}", packet, mapping);
        apply(&mapping.steps(), &mut self.sink, &mut self.delay)?;
        self.stats.record(&mapping);
        Ok(mapping)
    }

    /// Run until the source ends.
    ///
    /// Idle timeouts give the periodic report a chance to run. A sink failure
    /// is returned as an error; a source failure ends the run normally.
    pub fn run(mut self) -> BridgeResult<PipelineOutcome> {
        info!("Pipeline running");
        let mut last_report = Instant::now();

        let error = loop {
            match self.packets.next_or_timeout() {
                Some(Ok(Some(packet))) => {
                    self.handle_packet(&packet)?;
                }
                Some(Ok(None)) => {}
                Some(Err(e)) => break e,
                None => break SourceError::Closed,
            }

            if let Some(interval) = self.stats_interval
                && last_report.elapsed() >= interval
            {
                self.report();
                last_report = Instant::now();
            }
        };

        self.report();
        Ok(PipelineOutcome {
            exit: PipelineExit::SourceFailed(error),
            stats: self.stats(),
        })
    }

    fn report(&self) {
        let stats = self.stats();
        info!(
            bytes = stats.framer.bytes_read,
            packets = stats.framer.packets,
            rejected = stats.framer.rejected,
            discarded = stats.framer.discarded_bytes,
            timeouts = stats.framer.timeouts,
            axis_updates = stats.axis_updates,
            pulses = stats.pulses,
            ignored = stats.ignored,
            "Pipeline statistics"
        );
    }
}
