//! Terminator-synchronized packet framer
//!
//! Bytes accumulate until a [`TERMINATOR`] arrives with at least
//! [`PACKET_LEN`] bytes buffered. The last four bytes then form a candidate
//! packet and the buffer is cleared, dropping whatever preceded them. A
//! terminator seen with fewer than four bytes buffered is kept as ordinary
//! data.
//!
//! Only the last four bytes and whether the buffer has reached four bytes
//! ever influence a decision, so the framer keeps a fixed window plus a byte
//! count instead of a growing buffer.
//!
//! # Known limitation
//!
//! A noise byte equal to `0xFF` arriving after three or more buffered bytes
//! produces a false frame built from whatever precedes it. The wire format
//! has no checksum, so this cannot be detected here.

use super::{PACKET_LEN, Packet, ProtocolError, TERMINATOR};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Result of feeding one byte to the [`Framer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No complete frame yet.
    Pending,
    /// A candidate frame decoded into a packet.
    Packet(Packet),
    /// A candidate frame failed validation and was dropped.
    ///
    /// Candidates are only cut on a terminator, so this cannot fire unless
    /// the extraction rule changes.
    Rejected(ProtocolError),
}

/// Running counters for a [`Framer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramerStats {
    pub bytes_read: u64,
    pub packets: u64,
    /// Always zero under the current extraction rule; see
    /// [`FrameOutcome::Rejected`].
    pub rejected: u64,
    /// Bytes dropped ahead of an extracted candidate.
    pub discarded_bytes: u64,
    /// Read ticks that produced no byte.
    pub timeouts: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Framer {
    window: [u8; PACKET_LEN],
    buffered: usize,
    stats: FramerStats,
}

impl Framer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, byte: u8) -> FrameOutcome {
        self.stats.bytes_read = self.stats.bytes_read.saturating_add(1);

        self.window.rotate_left(1);
        if let Some(last) = self.window.last_mut() {
            *last = byte;
        }
        self.buffered = self.buffered.saturating_add(1);

        if byte != TERMINATOR || self.buffered < PACKET_LEN {
            return FrameOutcome::Pending;
        }

        let discarded = self.buffered.saturating_sub(PACKET_LEN);
        if discarded > 0 {
            debug!("Discarding {} bytes ahead of frame", discarded);
            self.stats.discarded_bytes = self
                .stats
                .discarded_bytes
                .saturating_add(discarded as u64);
        }

        let candidate = self.window;
        self.clear();

        match Packet::parse(&candidate) {
            Ok(packet) => {
                trace!("Framed packet: {:?}", packet);
                self.stats.packets = self.stats.packets.saturating_add(1);
                FrameOutcome::Packet(packet)
            }
            Err(e) => {
                debug!("Rejected candidate frame {:02x?}: {}", candidate, e);
                self.stats.rejected = self.stats.rejected.saturating_add(1);
                FrameOutcome::Rejected(e)
            }
        }
    }

    /// Feed a slice and collect every packet it completes.
    pub fn push_slice(&mut self, data: &[u8]) -> Vec<Packet> {
        data.iter()
            .filter_map(|&byte| match self.push(byte) {
                FrameOutcome::Packet(packet) => Some(packet),
                FrameOutcome::Pending | FrameOutcome::Rejected(_) => None,
            })
            .collect()
    }

    pub fn record_timeout(&mut self) {
        self.stats.timeouts = self.stats.timeouts.saturating_add(1);
    }

    /// Number of bytes accumulated since the last extracted candidate.
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    /// Drop buffered bytes. Counters are kept.
    pub fn clear(&mut self) {
        self.window = [0; PACKET_LEN];
        self.buffered = 0;
    }

    pub fn reset(&mut self) {
        self.clear();
        self.stats = FramerStats::default();
    }
}
