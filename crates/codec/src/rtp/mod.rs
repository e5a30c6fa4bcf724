//! ## RTP: A Transport Protocol for Real-Time Applications
//!
//! Only the parts of the RTP header [RFC3550] needed on the relay path are
//! looked at here: the version bits, the CSRC count and the header
//! extension.  Payload, padding and the remaining fixed fields are left to
//! whoever owns the media stream.
//!
//! [RFC3550]: https://tools.ietf.org/html/rfc3550

pub mod extensions;

pub use self::extensions::{
    ExtensionElement, OneByteExtensions, abs_send_time, abs_send_time_now, rewrite_abs_send_time,
};

use crate::{Error, read_u16};

pub const VERSION_MASK: u8 = 0b11000000;
pub const EXTENSION_MASK: u8 = 0b00010000;
pub const CSRC_COUNT_MASK: u8 = 0b00001111;

/// Size of the fixed RTP header.
pub const MIN_HEADER_SIZE: usize = 12;

/// Size of the header extension preamble: profile and length in words.
pub const EXTENSION_HEADER_SIZE: usize = 4;

/// Whether the version bits of the first byte say RTP version 2.
#[inline]
pub fn is_version_2(bytes: &[u8]) -> bool {
    bytes.first().is_some_and(|it| it & VERSION_MASK == 0x80)
}

/// Shape of an RTP header, as found by [`validate`].
///
/// ```bash
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |V=2|P|X|  CC   |M|     PT      |       sequence number         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                           timestamp                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           synchronization source (SSRC) identifier            |
/// +=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+=+
/// |            contributing source (CSRC) identifiers             |
/// |                             ....                              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |      defined by profile       |           length              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        header extension                       |
/// |                             ....                              |
/// ```
///
/// The fields are private: a value can only come out of a successful
/// validation, and it describes the buffer it was validated against.  It is
/// never worth caching, the next packet of the same stream may carry a
/// different CSRC list or extension block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpHeaderInfo {
    has_extension: bool,
    csrc_count: u8,
    header_length: usize,
}

impl RtpHeaderInfo {
    pub fn has_extension(&self) -> bool {
        self.has_extension
    }

    /// Number of CSRC identifiers, 0..=15.
    pub fn csrc_count(&self) -> u8 {
        self.csrc_count
    }

    /// Total header size: fixed header, CSRC list and extension block.
    pub fn header_length(&self) -> usize {
        self.header_length
    }

    /// Offset of the extension preamble, directly after the CSRC list.
    pub fn extension_offset(&self) -> usize {
        MIN_HEADER_SIZE + 4 * self.csrc_count as usize
    }
}

/// Checks that `bytes` can hold the RTP header it declares and computes
/// the header length.
///
/// This does not look at the version bits, see [`is_version_2`].
///
/// # Test
///
/// ```
/// use rtp_relay_codec::rtp::validate;
///
/// let buffer = [
///     0x90, 0x72, 0x04, 0xf1, 0xf8, 0x87, 0x3f, 0xad, 0x67, 0xfe,
///     0x9d, 0xfc, 0xbe, 0xde, 0x00, 0x01, 0x22, 0xaa, 0x36, 0x3f,
///     0x00, 0x00, 0x00, 0x00, 0x00,
/// ];
///
/// let header = validate(&buffer).unwrap();
/// assert!(header.has_extension());
/// assert_eq!(header.csrc_count(), 0);
/// assert_eq!(header.header_length(), 20);
///
/// // cut inside the extension block.
/// assert!(validate(&buffer[..18]).is_err());
/// ```
pub fn validate(bytes: &[u8]) -> Result<RtpHeaderInfo, Error> {
    let Some(first) = bytes.first() else {
        return Err(Error::InvalidRtpHeader);
    };

    let csrc_count = first & CSRC_COUNT_MASK;
    let base_length = MIN_HEADER_SIZE + 4 * csrc_count as usize;
    if base_length > bytes.len() {
        return Err(Error::InvalidRtpHeader);
    }

    // If extension bit is not set, we are done with header processing, as
    // the input length is verified above.
    if first & EXTENSION_MASK == 0 {
        return Ok(RtpHeaderInfo {
            has_extension: false,
            header_length: base_length,
            csrc_count,
        });
    }

    // extension length is in 32 bit words and excludes the preamble.
    let words = read_u16(bytes, base_length + 2).ok_or(Error::InvalidRtpHeader)? as usize;
    let header_length = base_length + EXTENSION_HEADER_SIZE + 4 * words;
    if header_length > bytes.len() {
        return Err(Error::InvalidRtpHeader);
    }

    Ok(RtpHeaderInfo {
        has_extension: true,
        header_length,
        csrc_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_header_only() {
        let mut bytes = [0u8; 12];
        bytes[0] = 0x80;

        let header = validate(&bytes).unwrap();
        assert!(!header.has_extension());
        assert_eq!(header.header_length(), 12);
        assert_eq!(validate(&bytes[..11]), Err(Error::InvalidRtpHeader));
    }

    #[test]
    fn csrc_list_counts_towards_header() {
        let mut bytes = vec![0u8; 12 + 4 * 15];
        bytes[0] = 0x8f;

        let header = validate(&bytes).unwrap();
        assert_eq!(header.csrc_count(), 15);
        assert_eq!(header.header_length(), 72);
        assert_eq!(header.extension_offset(), 72);
        assert_eq!(validate(&bytes[..71]), Err(Error::InvalidRtpHeader));
    }

    #[test]
    fn extension_preamble_must_fit() {
        let mut bytes = vec![0u8; 14];
        bytes[0] = 0x90;

        // the length field of the preamble is not even in the buffer.
        assert_eq!(validate(&bytes), Err(Error::InvalidRtpHeader));

        bytes.extend_from_slice(&[0x00, 0x00]);
        assert_eq!(validate(&bytes).map(|it| it.header_length()), Ok(16));
    }

    #[test]
    fn extension_length_must_fit() {
        let mut bytes = vec![0x90, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xbe, 0xde, 0xff, 0xff];
        bytes.resize(64, 0);

        assert_eq!(validate(&bytes), Err(Error::InvalidRtpHeader));
    }

    #[test]
    fn empty_input() {
        assert_eq!(validate(&[]), Err(Error::InvalidRtpHeader));
        assert!(!is_version_2(&[]));
        assert!(is_version_2(&[0xbf]));
        assert!(!is_version_2(&[0x40]));
    }
}
