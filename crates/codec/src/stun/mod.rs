pub mod attributes;
pub mod methods;

use crate::{Error, read_u16, read_u32};

use self::methods::StunMessageType;

/// Size of the fixed STUN header.
pub const HEADER_SIZE: usize = 20;

/// The magic cookie field MUST contain the fixed value 0x2112A442 in
/// network byte order.
pub const MAGIC_NUMBER: u32 = 0x2112A442;

/// A validated view of the fixed 20-byte STUN header.
///
/// ```bash
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |0 0|     STUN Message Type     |         Message Length        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Magic Cookie                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                     Transaction ID (96 bits)                  |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StunHeader<'a> {
    pub kind: StunMessageType,
    /// Length of the message body, not including the header.
    pub size: u16,
    bytes: &'a [u8],
}

impl<'a> StunHeader<'a> {
    /// message transaction id.
    #[inline]
    pub fn transaction_id(&self) -> &'a [u8] {
        &self.bytes[8..20]
    }

    /// Decodes the header of a complete STUN message.
    ///
    /// The declared body length must match the buffer exactly, a datagram
    /// carrying a STUN message has no room for trailing bytes.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::stun::*;
    /// use rtp_relay_codec::stun::methods::*;
    ///
    /// let buffer: [u8; 20] = [
    ///     0x00, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42, 0x72, 0x6d, 0x49, 0x42,
    ///     0x72, 0x52, 0x64, 0x48, 0x57, 0x62, 0x4b, 0x2b,
    /// ];
    ///
    /// let header = StunHeader::decode(&buffer[..]).unwrap();
    ///
    /// assert_eq!(header.kind, BINDING_REQUEST);
    /// assert_eq!(header.size, 0);
    /// assert_eq!(header.transaction_id(), &buffer[8..]);
    /// ```
    pub fn decode(bytes: &'a [u8]) -> Result<Self, Error> {
        // There must be at least a complete header.
        if bytes.len() < HEADER_SIZE {
            return Err(Error::InvalidInput);
        }

        // Check whether the magic number is the same.
        if read_u32(bytes, 4) != Some(MAGIC_NUMBER) {
            return Err(Error::NotFoundMagicNumber);
        }

        // The length field does not include the 20 bytes of the header, and
        // no slack is tolerated in either direction.
        let size = read_u16(bytes, 2).ok_or(Error::InvalidInput)?;
        if size as usize != bytes.len() - HEADER_SIZE {
            return Err(Error::InvalidInput);
        }

        let kind = StunMessageType::try_from(read_u16(bytes, 0).ok_or(Error::InvalidInput)?)?;
        Ok(Self { kind, size, bytes })
    }
}

/// Classifies a datagram as one of the recognised STUN message types.
///
/// Returns `None` for anything that is not a complete, well-formed STUN
/// header of a known type; callers treat such packets as opaque.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::stun::{classify, methods::*};
///
/// let mut buffer = vec![
///     0x01, 0x01, 0x00, 0x04, 0x21, 0x12, 0xa4, 0x42, 0x72, 0x6d, 0x49, 0x42,
///     0x72, 0x52, 0x64, 0x48, 0x57, 0x62, 0x4b, 0x2b, 0x00, 0x00, 0x00, 0x00,
/// ];
///
/// assert_eq!(classify(&buffer), Some(BINDING_RESPONSE));
///
/// // one byte of slack is enough to reject it.
/// buffer.push(0);
/// assert_eq!(classify(&buffer), None);
/// ```
pub fn classify(bytes: &[u8]) -> Option<StunMessageType> {
    StunHeader::decode(bytes).ok().map(|it| it.kind)
}

/// See [`StunMessageType::is_request_or_response`].
#[inline]
pub fn is_request_or_response(kind: StunMessageType) -> bool {
    kind.is_request_or_response()
}

/// On-wire size of a STUN message whose header starts `bytes`.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::stun::message_size;
///
/// let buffer: [u8; 20] = [
///     0x00, 0x01, 0x00, 0x08, 0x21, 0x12, 0xa4, 0x42, 0x72, 0x6d, 0x49, 0x42,
///     0x72, 0x52, 0x64, 0x48, 0x57, 0x62, 0x4b, 0x2b,
/// ];
///
/// assert_eq!(message_size(&buffer[..]).unwrap(), 28);
/// assert!(message_size(&buffer[..3]).is_err());
/// ```
pub fn message_size(bytes: &[u8]) -> Result<usize, Error> {
    if bytes.first().is_none_or(|it| it >> 6 != 0) {
        return Err(Error::InvalidInput);
    }

    Ok(read_u16(bytes, 2).ok_or(Error::InvalidInput)? as usize + HEADER_SIZE)
}

/// compute padding size.
///
/// RFC5766 stipulates that the attribute content is a multiple of 4.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::stun::alignment_32;
///
/// assert_eq!(alignment_32(4), 0);
/// assert_eq!(alignment_32(0), 0);
/// assert_eq!(alignment_32(5), 3);
/// ```
#[inline(always)]
pub fn alignment_32(size: usize) -> usize {
    let range = size % 4;
    if size == 0 || range == 0 {
        return 0;
    }

    4 - range
}
