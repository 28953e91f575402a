//! Fuzzes single-packet parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_packet_parse
#![no_main]
use libfuzzer_sys::fuzz_target;
use serwheel_protocol::Packet;

fuzz_target!(|data: &[u8]| {
    // Must never panic; a parsed packet re-encodes to the same bytes.
    if let Ok(packet) = Packet::parse(data) {
        assert_eq!(&packet.encode()[..], data);
    }
});
