use std::ops::Range;

use crate::{
    Error,
    channel_data::{self, ChannelData},
    read_u16, rtp,
    stun::{
        self,
        attributes::{AttributeCursor, AttributeType},
        methods::TURN_SEND_INDICATION,
    },
};

/// Outer framing of a packet on the relay path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The buffer is the RTP packet itself.
    RawRtp,
    /// The RTP packet is the application data of a ChannelData message.
    TurnChannelData {
        channel_number: u16,
        declared_length: u16,
    },
    /// The RTP packet is the DATA attribute of a STUN Send Indication.
    StunSendIndication { stun_message_length: u16 },
}

/// Where the candidate RTP packet sits inside the located buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLocation {
    pub kind: FrameKind,
    pub offset: usize,
    pub length: usize,
}

impl FrameLocation {
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }
}

/// Finds the RTP packet embedded in `packet`.
///
/// The framing is decided on the first bytes alone: top bits `0b01` mean
/// ChannelData, a Send Indication type means STUN, anything else is taken
/// as a bare RTP packet.  Whatever region that yields must then look like
/// an RTP version 2 packet with a complete header, otherwise the packet is
/// reported as [`Error::NotRtpLike`].
///
/// DTLS and RTCP are not filtered here, see [`crate::demux`].
///
/// # Test
///
/// ```
/// use rtp_relay_codec::frame::{FrameKind, locate};
///
/// let buffer = [
///     0x40, 0x00, 0x00, 0x0c, 0x80, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
///     0xca, 0xfe, 0xba, 0xbe,
/// ];
///
/// let location = locate(&buffer).unwrap();
///
/// assert_eq!(
///     location.kind,
///     FrameKind::TurnChannelData {
///         channel_number: 0x4000,
///         declared_length: 12,
///     }
/// );
///
/// assert_eq!(location.range(), 4..16);
/// ```
pub fn locate(packet: &[u8]) -> Result<FrameLocation, Error> {
    let location = if ChannelData::is_channel_data(packet) {
        locate_channel_data(packet)?
    } else if read_u16(packet, 0) == Some(TURN_SEND_INDICATION.into()) {
        locate_send_indication(packet)?
    } else {
        FrameLocation {
            kind: FrameKind::RawRtp,
            offset: 0,
            length: packet.len(),
        }
    };

    let candidate = &packet[location.range()];
    if candidate.len() < rtp::MIN_HEADER_SIZE || !rtp::is_version_2(candidate) {
        return Err(Error::NotRtpLike);
    }

    match rtp::validate(candidate) {
        Ok(header) if header.header_length() <= location.length => Ok(location),
        _ => Err(Error::NotRtpLike),
    }
}

fn locate_channel_data(packet: &[u8]) -> Result<FrameLocation, Error> {
    let message = ChannelData::decode(packet).map_err(|_| Error::NotRtpLike)?;

    Ok(FrameLocation {
        kind: FrameKind::TurnChannelData {
            channel_number: message.number(),
            declared_length: message.as_bytes().len() as u16,
        },
        offset: channel_data::HEADER_SIZE,
        length: message.as_bytes().len(),
    })
}

fn locate_send_indication(packet: &[u8]) -> Result<FrameLocation, Error> {
    if packet.len() <= stun::HEADER_SIZE {
        return Err(Error::NotRtpLike);
    }

    // the send path only ever sees complete messages, no slack.
    let stun_message_length = read_u16(packet, 2).ok_or(Error::NotRtpLike)?;
    if stun_message_length as usize + stun::HEADER_SIZE != packet.len() {
        return Err(Error::NotRtpLike);
    }

    let data = AttributeCursor::new(packet, stun::HEADER_SIZE)
        .find_attribute(AttributeType::Data)
        .ok_or(Error::NotRtpLike)?;

    Ok(FrameLocation {
        kind: FrameKind::StunSendIndication {
            stun_message_length,
        },
        offset: data.offset,
        length: data.value.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RTP: [u8; 12] = [
        0x80, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0xca, 0xfe, 0xba, 0xbe,
    ];

    fn send_indication(attributes: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0x00, 0x16];
        bytes.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&stun::MAGIC_NUMBER.to_be_bytes());
        bytes.extend_from_slice(&[1u8; 12]);
        bytes.extend_from_slice(attributes);
        bytes
    }

    #[test]
    fn raw_rtp_is_the_whole_buffer() {
        let location = locate(&RTP).unwrap();

        assert_eq!(location.kind, FrameKind::RawRtp);
        assert_eq!(location.range(), 0..12);
    }

    #[test]
    fn raw_rtp_needs_version_2() {
        let mut bytes = RTP;
        bytes[0] = 0xc0;

        assert_eq!(locate(&bytes), Err(Error::NotRtpLike));
        assert_eq!(locate(&RTP[..11]), Err(Error::NotRtpLike));
        assert_eq!(locate(&[]), Err(Error::NotRtpLike));
    }

    #[test]
    fn channel_data_with_truncated_length_is_rejected() {
        let mut bytes = vec![0x40, 0x01, 0x00, 0x20];
        bytes.extend_from_slice(&RTP);

        assert_eq!(locate(&bytes), Err(Error::NotRtpLike));
        assert_eq!(locate(&bytes[..3]), Err(Error::NotRtpLike));
    }

    #[test]
    fn channel_data_ignores_trailing_padding() {
        let mut bytes = vec![0x7f, 0xff, 0x00, 0x0c];
        bytes.extend_from_slice(&RTP);
        bytes.extend_from_slice(&[0, 0, 0, 0]);

        let location = locate(&bytes).unwrap();
        assert_eq!(location.range(), 4..16);
    }

    #[test]
    fn send_indication_points_at_data_value() {
        let mut attributes = vec![0x00, 0x12, 0x00, 0x08, 0x00, 0x01, 0x12, 0x34, 1, 2, 3, 4];
        attributes.extend_from_slice(&[0x00, 0x13, 0x00, 0x0c]);
        attributes.extend_from_slice(&RTP);

        let bytes = send_indication(&attributes);
        let location = locate(&bytes).unwrap();

        assert_eq!(
            location.kind,
            FrameKind::StunSendIndication {
                stun_message_length: 28
            }
        );

        assert_eq!(location.range(), 36..48);
        assert_eq!(&bytes[location.range()], &RTP);
    }

    #[test]
    fn send_indication_without_data_is_rejected() {
        let bytes = send_indication(&[0x00, 0x12, 0x00, 0x04, 0x00, 0x01, 0x12, 0x34]);
        assert_eq!(locate(&bytes), Err(Error::NotRtpLike));

        // header only.
        let bytes = send_indication(&[]);
        assert_eq!(locate(&bytes), Err(Error::NotRtpLike));
    }

    #[test]
    fn send_indication_length_must_match() {
        let mut attributes = vec![0x00, 0x13, 0x00, 0x0c];
        attributes.extend_from_slice(&RTP);

        let mut bytes = send_indication(&attributes);
        bytes.push(0);
        assert_eq!(locate(&bytes), Err(Error::NotRtpLike));
    }

    #[test]
    fn send_indication_attribute_overrun_is_rejected() {
        let mut attributes = vec![0x00, 0x13, 0x00, 0x40];
        attributes.extend_from_slice(&RTP);

        assert_eq!(locate(&send_indication(&attributes)), Err(Error::NotRtpLike));
    }

    #[test]
    fn short_data_attribute_fails_rtp_check() {
        // an 8-byte DATA value cannot hold a 12-byte RTP header.
        let mut attributes = vec![0x00, 0x13, 0x00, 0x08];
        attributes.extend_from_slice(&RTP);

        let bytes = send_indication(&attributes);
        assert_eq!(locate(&bytes), Err(Error::NotRtpLike));
    }

    #[test]
    fn rtp_extension_must_fit_in_region() {
        let mut rtp = RTP.to_vec();
        rtp[0] = 0x90;
        rtp.extend_from_slice(&[0xbe, 0xde, 0x00, 0x01, 0x22, 1, 2, 3]);

        let mut bytes = vec![0x40, 0x00, 0x00, 0x10];
        bytes.extend_from_slice(&rtp);
        assert_eq!(locate(&bytes), Err(Error::NotRtpLike));

        bytes[3] = 0x14;
        assert_eq!(locate(&bytes).map(|it| it.length), Ok(20));
    }
}
