//! Property-based tests for the serwheel framer.
//!
//! Uses proptest to check that framing recovers every packet from streams
//! mixed with noise, timeouts, and arbitrary bytes.

use proptest::prelude::*;
use serwheel_protocol::mock::ScriptedSource;
use serwheel_protocol::{Framer, PACKET_LEN, Packet, TERMINATOR};

/// Packets whose payload bytes never equal the terminator.
fn clean_packet() -> impl Strategy<Value = Packet> {
    (0u8..TERMINATOR, 0u8..TERMINATOR, 0u8..TERMINATOR)
        .prop_map(|(kind, lo, hi)| Packet::new(kind, u16::from_le_bytes([lo, hi])))
}

fn any_packet() -> impl Strategy<Value = Packet> {
    (any::<u8>(), any::<u16>()).prop_map(|(kind, value)| Packet::new(kind, value))
}

/// Noise runs that never contain the terminator.
fn noise() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..TERMINATOR, 0..16)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    /// Back-to-back packets from a clean start decode exactly, whatever
    /// their payload bytes.
    #[test]
    fn prop_contiguous_packets_decode_exactly(
        packets in proptest::collection::vec(any_packet(), 0..32),
    ) {
        let stream: Vec<u8> = packets.iter().flat_map(Packet::encode).collect();
        let mut framer = Framer::new();
        prop_assert_eq!(framer.push_slice(&stream), packets);
        prop_assert_eq!(framer.buffered(), 0);
    }

    /// Noise interleaved between packets is discarded and every packet is
    /// recovered, as long as neither noise nor payload holds a 0xFF.
    #[test]
    fn prop_noise_is_discarded(
        frames in proptest::collection::vec((noise(), clean_packet()), 0..24),
        trailing in noise(),
    ) {
        let mut stream = Vec::new();
        let mut expected = Vec::new();
        for (junk, packet) in &frames {
            stream.extend_from_slice(junk);
            stream.extend_from_slice(&packet.encode());
            expected.push(*packet);
        }
        stream.extend_from_slice(&trailing);

        let mut framer = Framer::new();
        prop_assert_eq!(framer.push_slice(&stream), expected);

        let junk_total: usize = frames.iter().map(|(junk, _)| junk.len()).sum();
        prop_assert_eq!(framer.stats().discarded_bytes, junk_total as u64);
        prop_assert_eq!(framer.buffered(), trailing.len());
    }

    /// Arbitrary input never yields more packets than full frames it could
    /// hold, and every byte is accounted for.
    #[test]
    fn prop_arbitrary_bytes_are_accounted_for(
        data in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut framer = Framer::new();
        let packets = framer.push_slice(&data);
        let stats = framer.stats();

        prop_assert!(packets.len() <= data.len() / PACKET_LEN);
        prop_assert_eq!(stats.bytes_read, data.len() as u64);
        prop_assert_eq!(stats.rejected, 0);
        let consumed = stats.packets * PACKET_LEN as u64 + stats.discarded_bytes;
        prop_assert_eq!(consumed + framer.buffered() as u64, data.len() as u64);
    }

    /// Timeout ticks between bytes never change what is decoded.
    #[test]
    fn prop_timeouts_do_not_affect_framing(
        packets in proptest::collection::vec(any_packet(), 1..16),
        gaps in proptest::collection::vec(any::<bool>(), 64),
    ) {
        let stream: Vec<u8> = packets.iter().flat_map(Packet::encode).collect();
        let mut source = ScriptedSource::new();
        for (i, byte) in stream.iter().enumerate() {
            if gaps.get(i % gaps.len()).copied().unwrap_or(false) {
                source = source.timeout();
            }
            source = source.bytes(&[*byte]);
        }

        let decoded: Vec<Packet> = Framer::new()
            .packets(source)
            .take_while(Result::is_ok)
            .filter_map(Result::ok)
            .collect();
        prop_assert_eq!(decoded, packets);
    }

    /// Packet::parse never panics and only accepts terminated 4-byte frames.
    #[test]
    fn prop_parse_accepts_only_terminated_frames(
        data in proptest::collection::vec(any::<u8>(), 0..8),
    ) {
        let accepted = Packet::parse(&data).is_ok();
        let well_formed = data.len() == PACKET_LEN && data.last() == Some(&TERMINATOR);
        prop_assert_eq!(accepted, well_formed);
    }
}

#[test]
fn test_resync_after_short_fragment() -> Result<(), Box<dyn std::error::Error>> {
    let mut framer = Framer::new();
    let packets = framer.push_slice(&[0x01, 0x02, 0xFF, 15, 50, 0, 0xFF]);
    assert_eq!(packets, vec![Packet::new(15, 50)]);
    Ok(())
}
