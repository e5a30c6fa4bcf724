//! ## RTP framing over relayed transports
//!
//! [RFC3550]: https://tools.ietf.org/html/rfc3550
//! [RFC3711]: https://tools.ietf.org/html/rfc3711
//! [RFC8285]: https://tools.ietf.org/html/rfc8285
//! [RFC8656]: https://tools.ietf.org/html/rfc8656
//!
//! When media travels through a TURN relay, the RTP packet [RFC3550] that
//! the application produced is not always the first thing on the wire. It
//! can be sent bare, wrapped in a ChannelData message, or carried inside
//! the DATA attribute of a STUN Send Indication [RFC8656]. Anything that
//! wants to look at or modify the RTP header on the send or receive path
//! first has to find where the RTP packet starts.
//!
//! This crate does exactly that and a little more: it locates the embedded
//! RTP packet, validates its header, rewrites the abs-send-time element of
//! a one-byte header extension [RFC8285], and writes the truncated
//! HMAC-SHA1 authentication tag used by SRTP [RFC3711]. Every function here
//! is pure and works on caller-owned buffers, so they may be called from any
//! number of threads at once.

pub mod channel_data;
pub mod crypto;
pub mod demux;
pub mod frame;
pub mod framing;
pub mod rtp;
pub mod srtp;
pub mod stun;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidInput,
    NotRtpLike,
    InvalidRtpHeader,
    NotFoundMagicNumber,
    UnknownMethod,
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Reads a big-endian u16 at `offset`, or `None` if it does not fit.
#[inline]
pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    bytes
        .get(offset..end)
        .map(|it| u16::from_be_bytes([it[0], it[1]]))
}

/// Reads a big-endian u32 at `offset`, or `None` if it does not fit.
#[inline]
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    bytes
        .get(offset..end)
        .map(|it| u32::from_be_bytes([it[0], it[1], it[2], it[3]]))
}

/// Logs a caller contract violation and aborts the current operation.
///
/// These are bugs in the transport layer, not malformed network input, so
/// they are never surfaced as an `Err`.
#[cold]
#[track_caller]
pub(crate) fn contract_violation(message: &str) -> ! {
    log::error!("contract violation: {}", message);
    panic!("contract violation: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_helpers_are_bounds_checked() {
        let bytes = [0x12, 0x34, 0x56, 0x78];

        assert_eq!(read_u16(&bytes, 0), Some(0x1234));
        assert_eq!(read_u16(&bytes, 2), Some(0x5678));
        assert_eq!(read_u16(&bytes, 3), None);
        assert_eq!(read_u16(&bytes, usize::MAX), None);
        assert_eq!(read_u32(&bytes, 0), Some(0x1234_5678));
        assert_eq!(read_u32(&bytes, 1), None);
    }
}
