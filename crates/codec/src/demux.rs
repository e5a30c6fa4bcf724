//! Demultiplexing of the protocols that share one relay 5-tuple.
//!
//! [RFC7983]: https://tools.ietf.org/html/rfc7983
//!
//! The first byte decides, as laid out in [RFC7983]:
//!
//! ```text
//!              +----------------+
//!              |        [0..3] -+--> STUN
//!              |                |
//!              |      [16..19] -+--> ZRTP
//!              |                |
//!  packet -->  |      [20..63] -+--> DTLS
//!              |                |
//!              |      [64..79] -+--> TURN Channel
//!              |                |
//!              |    [128..191] -+--> RTP/RTCP
//!              +----------------+
//! ```
//!
//! Callers use this to keep DTLS and RTCP away from the RTP mutation path.

use crate::{channel_data::ChannelData, rtp, stun};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Stun,
    ChannelData,
    Dtls,
    Rtp,
    Rtcp,
    Unknown,
}

impl PacketKind {
    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::demux::PacketKind;
    ///
    /// assert_eq!(PacketKind::identify(&[0x16, 0xfe, 0xfd]), PacketKind::Dtls);
    /// assert_eq!(PacketKind::identify(&[0x80, 0xc8]), PacketKind::Rtcp);
    /// assert_eq!(PacketKind::identify(&[0x80, 0x60]), PacketKind::Rtp);
    /// assert_eq!(PacketKind::identify(&[0x40, 0x00, 0x00, 0x00]), PacketKind::ChannelData);
    /// assert_eq!(PacketKind::identify(&[0xff]), PacketKind::Unknown);
    /// ```
    pub fn identify(bytes: &[u8]) -> Self {
        let Some(&byte) = bytes.first() else {
            return Self::Unknown;
        };

        match byte {
            0..=3 if bytes.len() >= stun::HEADER_SIZE => Self::Stun,
            20..=63 => Self::Dtls,
            _ if ChannelData::is_channel_data(bytes) => Self::ChannelData,
            _ if rtp::is_version_2(bytes) => {
                if is_rtcp_packet(bytes) {
                    Self::Rtcp
                } else {
                    Self::Rtp
                }
            }
            _ => Self::Unknown,
        }
    }
}

/// Whether the first byte falls in the DTLS content type range.
#[inline]
pub fn is_dtls_packet(bytes: &[u8]) -> bool {
    bytes.first().is_some_and(|it| (20..64).contains(it))
}

/// Whether the second byte is an RTCP packet type (192..=223 with the
/// marker bit folded away), which would otherwise read as an RTP payload
/// type in 64..96.
#[inline]
pub fn is_rtcp_packet(bytes: &[u8]) -> bool {
    bytes.get(1).is_some_and(|it| (64..96).contains(&(it & 0x7F)))
}
