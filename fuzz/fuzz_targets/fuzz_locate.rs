#![no_main]

use libfuzzer_sys::fuzz_target;
use rtp_relay::codec::{frame::locate, rtp};

fuzz_target!(|data: &[u8]| {
    // a located region must always carry a header that fits inside it.
    if let Ok(location) = locate(data) {
        let candidate = &data[location.range()];
        let header = rtp::validate(candidate).unwrap();
        assert!(header.header_length() <= location.length);

        if let Some(elements) = rtp::OneByteExtensions::new(candidate, &header) {
            for element in elements {
                assert!(element.payload().end <= header.header_length());
            }
        }
    }
});
