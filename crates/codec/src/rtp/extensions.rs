use std::time::{SystemTime, UNIX_EPOCH};

use crate::{contract_violation, read_u16};

use super::{EXTENSION_HEADER_SIZE, RtpHeaderInfo};

/// Profile value of the one-byte header extension format.
pub const ONE_BYTE_PROFILE: u16 = 0xBEDE;

/// Payload size of the abs-send-time element.
pub const ABS_SEND_TIME_SIZE: usize = 3;

/// Number of fractional bits of the abs-send-time value.
const ABS_SEND_TIME_FRACTION_BITS: u32 = 18;

/// Id value reserved to end the extension block.
const TERMINATOR_ID: u8 = 15;

/// One element of a one-byte header extension block.
///
/// ```bash
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |       0xBE    |    0xDE       |           length=3            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  ID   | L=0   |     data      |  ID   |  L=1  |   data...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionElement {
    /// 0..=15
    pub id: u8,
    /// 0..=15, the payload is one byte longer than this.
    pub length_minus_one: u8,
    /// Offset of the payload in the RTP packet.
    pub payload_offset: usize,
}

impl ExtensionElement {
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.length_minus_one as usize + 1
    }

    /// Payload range in the RTP packet.
    #[inline]
    pub fn payload(&self) -> std::ops::Range<usize> {
        self.payload_offset..self.payload_offset + self.payload_len()
    }
}

/// Linear scan over the elements of a one-byte header extension block.
///
/// The scan is confined to the declared extension block and ends on the
/// first element whose payload would cross its end.  Zero bytes between
/// elements are padding.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::rtp::{OneByteExtensions, validate};
///
/// let buffer = [
///     0x90, 0x72, 0x04, 0xf1, 0xf8, 0x87, 0x3f, 0xad, 0x67, 0xfe,
///     0x9d, 0xfc, 0xbe, 0xde, 0x00, 0x02, 0x10, 0xff, 0x00, 0x00,
///     0x32, 0x01, 0x02, 0x03,
/// ];
///
/// let header = validate(&buffer).unwrap();
/// let elements = OneByteExtensions::new(&buffer, &header)
///     .unwrap()
///     .map(|it| (it.id, it.payload_offset, it.payload_len()))
///     .collect::<Vec<_>>();
///
/// assert_eq!(elements, vec![(1, 17, 1), (3, 21, 3)]);
/// ```
pub struct OneByteExtensions<'a> {
    bytes: &'a [u8],
    offset: usize,
    end: usize,
}

impl<'a> OneByteExtensions<'a> {
    /// Returns `None` when the header has no extension or the extension is
    /// not in the one-byte format.
    ///
    /// `header` must have been produced by validating `rtp`.
    pub fn new(rtp: &'a [u8], header: &RtpHeaderInfo) -> Option<Self> {
        if header.header_length() > rtp.len() {
            contract_violation("rtp header info does not describe this buffer");
        }

        if !header.has_extension() {
            return None;
        }

        let offset = header.extension_offset();
        if read_u16(rtp, offset)? != ONE_BYTE_PROFILE {
            return None;
        }

        Some(Self {
            offset: offset + EXTENSION_HEADER_SIZE,
            end: header.header_length(),
            bytes: rtp,
        })
    }

    fn skip_padding(&mut self) {
        while self.offset < self.end && self.bytes[self.offset] == 0 {
            self.offset += 1;
        }
    }
}

impl Iterator for OneByteExtensions<'_> {
    type Item = ExtensionElement;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_padding();
        if self.offset >= self.end {
            return None;
        }

        let byte = self.bytes[self.offset];
        let element = ExtensionElement {
            id: byte >> 4,
            length_minus_one: byte & 0x0F,
            payload_offset: self.offset + 1,
        };

        if element.id == TERMINATOR_ID || element.payload().end > self.end {
            self.offset = self.end;
            return None;
        }

        self.offset = element.payload().end;
        Some(element)
    }
}

/// Converts a wall-clock time in microseconds to the 24-bit abs-send-time
/// value: seconds in 6.18 fixed point, wrapping every 64 seconds.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::rtp::abs_send_time;
///
/// assert_eq!(abs_send_time(0), 0);
/// assert_eq!(abs_send_time(1_000_000), 1 << 18);
/// assert_eq!(abs_send_time(500_000), 1 << 17);
/// assert_eq!(abs_send_time(64_000_000), 0);
/// ```
pub fn abs_send_time(now_us: u64) -> u32 {
    let fixed = ((now_us as u128) << ABS_SEND_TIME_FRACTION_BITS) / 1_000_000;
    (fixed & 0x00FF_FFFF) as u32
}

/// [`abs_send_time`] of the current wall-clock time.
pub fn abs_send_time_now() -> u32 {
    let now_us = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|it| it.as_micros() as u64)
        .unwrap_or_default();

    abs_send_time(now_us)
}

/// Overwrites the abs-send-time element `extension_id` with the low 24 bits
/// of `abs_send_time`, in network byte order.
///
/// Returns whether the element was found and written.  Nothing is touched
/// when the packet has no one-byte extension block, when no element has
/// that id, or when the element is not exactly three bytes long.
///
/// `header` must come from validating this same buffer; passing the header
/// of a different, longer packet is a caller bug and panics.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::rtp::{rewrite_abs_send_time, validate};
///
/// let mut buffer = [
///     0x90, 0x72, 0x04, 0xf1, 0xf8, 0x87, 0x3f, 0xad, 0x67, 0xfe,
///     0x9d, 0xfc, 0xbe, 0xde, 0x00, 0x01, 0x22, 0xaa, 0x36, 0x3f,
///     0x00, 0x00, 0x00, 0x00, 0x00,
/// ];
///
/// let header = validate(&buffer).unwrap();
///
/// assert!(rewrite_abs_send_time(&mut buffer, &header, 2, 0x00123456));
/// assert_eq!(&buffer[17..20], &[0x12, 0x34, 0x56]);
///
/// assert!(!rewrite_abs_send_time(&mut buffer, &header, 3, 0x00abcdef));
/// assert_eq!(&buffer[17..20], &[0x12, 0x34, 0x56]);
/// ```
pub fn rewrite_abs_send_time(
    rtp: &mut [u8],
    header: &RtpHeaderInfo,
    extension_id: u8,
    abs_send_time: u32,
) -> bool {
    let Some(element) = OneByteExtensions::new(rtp, header)
        .and_then(|mut it| it.find(|element| element.id == extension_id))
    else {
        return false;
    };

    if element.payload_len() != ABS_SEND_TIME_SIZE {
        log::debug!(
            "abs-send-time extension has unexpected size: id={}, size={}",
            extension_id,
            element.payload_len()
        );

        return false;
    }

    rtp[element.payload()].copy_from_slice(&abs_send_time.to_be_bytes()[1..]);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtp::validate;

    /// Fixed header, then `block` as one-byte extension elements, then a
    /// 4-byte payload.
    fn packet(block: &[u8]) -> Vec<u8> {
        assert_eq!(block.len() % 4, 0);

        let mut bytes = vec![0x90, 0x60, 0x00, 0x01, 0, 0, 0, 1, 0xca, 0xfe, 0xba, 0xbe];
        bytes.extend_from_slice(&ONE_BYTE_PROFILE.to_be_bytes());
        bytes.extend_from_slice(&((block.len() / 4) as u16).to_be_bytes());
        bytes.extend_from_slice(block);
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        bytes
    }

    #[test]
    fn rewrites_only_the_target_payload() {
        let mut bytes = packet(&[0x10, 0xaa, 0x00, 0x00, 0x52, 1, 2, 3, 0x00, 0x00, 0x00, 0x00]);
        let original = bytes.clone();
        let header = validate(&bytes).unwrap();

        assert!(rewrite_abs_send_time(&mut bytes, &header, 5, 0xff_01_02_03));

        assert_eq!(&bytes[21..24], &[0x01, 0x02, 0x03]);
        assert_eq!(&bytes[..21], &original[..21]);
        assert_eq!(&bytes[24..], &original[24..]);
    }

    #[test]
    fn leading_padding_is_skipped() {
        let bytes = packet(&[0x00, 0x00, 0x22, 7, 8, 9, 0x00, 0x00]);
        let header = validate(&bytes).unwrap();
        let elements = OneByteExtensions::new(&bytes, &header)
            .unwrap()
            .collect::<Vec<_>>();

        assert_eq!(
            elements,
            vec![ExtensionElement {
                id: 2,
                length_minus_one: 2,
                payload_offset: 19,
            }]
        );
    }

    #[test]
    fn element_crossing_block_end_stops_scan() {
        // id 3 claims 16 bytes but the block only has 3 left.
        let mut bytes = packet(&[0x3f, 0x01, 0x02, 0x03]);
        let original = bytes.clone();
        let header = validate(&bytes).unwrap();

        assert!(!rewrite_abs_send_time(&mut bytes, &header, 3, 0x123456));
        assert_eq!(bytes, original);
    }

    #[test]
    fn wrong_size_element_is_left_alone() {
        let mut bytes = packet(&[0x21, 0xaa, 0xbb, 0x00]);
        let original = bytes.clone();
        let header = validate(&bytes).unwrap();

        assert!(!rewrite_abs_send_time(&mut bytes, &header, 2, 0x123456));
        assert_eq!(bytes, original);
    }

    #[test]
    fn terminator_ends_block() {
        let mut bytes = packet(&[0xf0, 0x00, 0x22, 1, 2, 3, 0x00, 0x00]);
        let header = validate(&bytes).unwrap();

        assert!(!rewrite_abs_send_time(&mut bytes, &header, 2, 0x123456));
    }

    #[test]
    fn two_byte_profile_is_not_scanned() {
        let mut bytes = packet(&[0x22, 1, 2, 3]);
        bytes[12] = 0x10;
        bytes[13] = 0x00;
        let header = validate(&bytes).unwrap();

        assert!(OneByteExtensions::new(&bytes, &header).is_none());
        assert!(!rewrite_abs_send_time(&mut bytes, &header, 2, 0x123456));
    }

    #[test]
    fn no_extension_bit() {
        let mut bytes = vec![0x80u8; 16];
        let header = validate(&bytes).unwrap();

        assert!(!rewrite_abs_send_time(&mut bytes, &header, 1, 0x123456));
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn header_of_another_packet_panics() {
        let long = packet(&[0x22, 1, 2, 3]);
        let header = validate(&long).unwrap();
        let mut short = long[..16].to_vec();

        rewrite_abs_send_time(&mut short, &header, 2, 0);
    }

    #[test]
    fn abs_send_time_wraps_at_64_seconds() {
        assert_eq!(abs_send_time(63_999_999), 0x00FF_FFFF);
        assert_eq!(abs_send_time(1_700_000_000_000_000), abs_send_time(1_700_000_000_000_000 % 64_000_000));
        assert!(abs_send_time_now() <= 0x00FF_FFFF);
    }
}
