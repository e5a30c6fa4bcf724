#![no_main]

use libfuzzer_sys::fuzz_target;
use rtp_relay::codec::stun::{
    self, HEADER_SIZE, StunHeader,
    attributes::{AttributeCursor, AttributeType},
};

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = StunHeader::decode(data) {
        assert_eq!(header.size as usize + HEADER_SIZE, data.len());
        assert_eq!(header.transaction_id().len(), 12);
        assert_eq!(stun::classify(data), Some(header.kind));
    }

    for attribute in AttributeCursor::new(data, HEADER_SIZE) {
        assert!(attribute.offset + attribute.value.len() <= data.len());
    }

    let _ = AttributeCursor::new(data, HEADER_SIZE).find_attribute(AttributeType::Data);
});
