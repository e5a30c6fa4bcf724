#![no_main]

use libfuzzer_sys::fuzz_target;
use rtp_relay::codec::{channel_data::ChannelData, framing::Framing};

fuzz_target!(|data: &[u8]| {
    for framing in [Framing::LengthPrefixed, Framing::Stun] {
        let mut remaining = data;

        while let Ok(Some((packet, consumed))) = framing.split(remaining) {
            assert!(consumed > 0 && consumed <= remaining.len());
            assert!(packet.len() <= consumed);

            if framing == Framing::Stun && ChannelData::is_channel_data(packet) {
                let _ = ChannelData::decode(packet);
            }

            remaining = &remaining[consumed..];
        }
    }
});
