//! Fuzzes the resynchronizing framer.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_framer
#![no_main]
use libfuzzer_sys::fuzz_target;
use serwheel_protocol::{FrameOutcome, Framer, PACKET_LEN, TERMINATOR};

fuzz_target!(|data: &[u8]| {
    let mut framer = Framer::new();
    for &byte in data {
        if let FrameOutcome::Packet(packet) = framer.push(byte) {
            assert_eq!(packet.encode()[PACKET_LEN - 1], TERMINATOR);
        }
    }

    // Every byte is framed, discarded or still buffered.
    let stats = framer.stats();
    assert_eq!(stats.bytes_read, data.len() as u64);
    assert_eq!(
        (stats.packets + stats.rejected) * PACKET_LEN as u64
            + stats.discarded_bytes
            + framer.buffered() as u64,
        data.len() as u64
    );
});
