#![no_main]

use libfuzzer_sys::fuzz_target;
use rtp_relay::options::{PacketOptions, apply_packet_options};

fuzz_target!(|data: &[u8]| {
    let Some((&id, packet)) = data.split_first() else {
        return;
    };

    // the 4-byte tag always fits, a located rtp packet is at least 12 bytes.
    let options = PacketOptions::default()
        .with_abs_send_time(id % 16, Some(0x00abcdef))
        .with_auth(&b"fuzzing key"[..], 4, 0);

    let mut packet = packet.to_vec();
    let _ = apply_packet_options(&mut packet, &options);
});
