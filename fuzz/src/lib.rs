#![cfg(test)]

use bytes::BytesMut;
use proptest::{collection::vec, prelude::*, prop_oneof};

use rtp_relay::codec::{
    channel_data::ChannelData,
    frame::{FrameKind, locate},
    framing::Framing,
    rtp,
};

/// A version 2 rtp header with `csrc` contributing sources and an optional
/// one-byte extension block of `words` words, followed by `payload`.
fn rtp_packet(csrc: u8, words: Option<u8>, payload: Vec<u8>) -> Vec<u8> {
    let extension = if words.is_some() { 0x10 } else { 0 };

    let mut bytes = vec![0x80 | extension | csrc, 0x60, 0x12, 0x34, 0, 0, 0, 1, 0xca, 0xfe, 0xba, 0xbe];
    bytes.extend(std::iter::repeat_n(0x11, 4 * csrc as usize));

    if let Some(words) = words {
        bytes.extend_from_slice(&[0xbe, 0xde, 0x00, words]);
        bytes.extend(std::iter::repeat_n(0, 4 * words as usize));
    }

    bytes.extend_from_slice(&payload);
    bytes
}

fn rtp_packets() -> impl Strategy<Value = Vec<u8>> {
    (0u8..16, proptest::option::of(0u8..8), vec(any::<u8>(), 0..256))
        .prop_map(|(csrc, words, payload)| rtp_packet(csrc, words, payload))
}

fn channel_data(rtp: Vec<u8>, number: u16) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(rtp.len() + 4);
    ChannelData {
        number,
        bytes: &rtp,
    }
    .encode(&mut bytes);

    bytes.to_vec()
}

fn fuzz_inputs() -> impl Strategy<Value = Vec<u8>> {
    let raw = vec(any::<u8>(), 0..=1500);
    let channel = (rtp_packets(), 0x4000u16..=0x7FFF).prop_map(|(rtp, number)| channel_data(rtp, number));

    prop_oneof![raw, rtp_packets(), channel]
}

proptest! {
    /// Mixed corpus containing arbitrary bytes, rtp packets and rtp packets
    /// wrapped in ChannelData.
    #[test]
    fn locate_respects_invariants(data in fuzz_inputs()) {
        let Ok(location) = locate(&data) else {
            return Ok(());
        };

        prop_assert!(location.range().end <= data.len());

        let header = rtp::validate(&data[location.range()]);
        prop_assert!(header.is_ok());
        prop_assert!(header.unwrap().header_length() <= location.length);

        if let FrameKind::TurnChannelData { declared_length, .. } = location.kind {
            prop_assert_eq!(declared_length as usize, location.length);
            prop_assert_eq!(location.offset, 4);
        }
    }

    #[test]
    fn wrapped_rtp_is_found(rtp in rtp_packets(), number in 0x4000u16..=0x7FFF) {
        let expected = rtp::validate(&rtp).unwrap().header_length();
        let bytes = channel_data(rtp.clone(), number);
        let location = locate(&bytes).unwrap();

        prop_assert_eq!(&bytes[location.range()], rtp.as_slice());
        prop_assert_eq!(rtp::validate(&bytes[location.range()]).unwrap().header_length(), expected);
    }

    #[test]
    fn stream_framing_splits_back_to_back_messages(
        packets in vec(rtp_packets(), 1..8),
        number in 0x4000u16..=0x7FFF,
    ) {
        let mut stream = Vec::new();
        for packet in &packets {
            stream.extend_from_slice(&channel_data(packet.clone(), number));
            while stream.len() % 4 != 0 {
                stream.push(0);
            }
        }

        let mut remaining = stream.as_slice();
        for packet in &packets {
            let (message, consumed) = Framing::Stun.split(remaining).unwrap().unwrap();
            prop_assert_eq!(ChannelData::decode(message).unwrap().bytes, packet.as_slice());
            remaining = &remaining[consumed..];
        }

        prop_assert!(remaining.is_empty());
    }
}
