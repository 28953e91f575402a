//! Fuzzes the framer and mapper together on arbitrary serial input.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_mapper_stream
#![no_main]
use libfuzzer_sys::fuzz_target;
use serwheel_mapper::mock::{RecordingDelay, RecordingSink};
use serwheel_mapper::{DeviceEvent, Mapper};
use serwheel_protocol::Framer;

fuzz_target!(|data: &[u8]| {
    let mut framer = Framer::new();
    let mut mapper = Mapper::default();
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::new();

    for packet in framer.push_slice(data) {
        sink.clear();
        if mapper.process(&packet, &mut sink, &mut delay).is_err() {
            return;
        }
        assert_eq!(sink.events().last(), Some(&DeviceEvent::Sync));
    }
});
