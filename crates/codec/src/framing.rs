use crate::{Error, channel_data::ChannelData, read_u16, stun};

/// Size of the length prefix of [`Framing::LengthPrefixed`].
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// How packets are delimited on a stream transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Every packet is preceded by its length as a big-endian u16.
    LengthPrefixed,
    /// STUN messages and ChannelData messages back to back, ChannelData
    /// padded to a multiple of four bytes.
    Stun,
}

impl Framing {
    /// On-wire size of the first packet in `bytes`.
    ///
    /// Returns `Ok(None)` while not enough bytes have arrived to read the
    /// packet's length.  The returned size can be larger than `bytes`; the
    /// caller keeps reading until it has that many bytes.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::framing::Framing;
    ///
    /// assert_eq!(Framing::LengthPrefixed.packet_size(&[0x00]), Ok(None));
    /// assert_eq!(Framing::LengthPrefixed.packet_size(&[0x00, 0x0c]), Ok(Some(14)));
    ///
    /// let channel_data = [0x40, 0x00, 0x00, 0x0d];
    /// assert_eq!(Framing::Stun.packet_size(&channel_data), Ok(Some(20)));
    ///
    /// let binding = [0x00, 0x01, 0x00, 0x08];
    /// assert_eq!(Framing::Stun.packet_size(&binding), Ok(Some(28)));
    /// ```
    pub fn packet_size(&self, bytes: &[u8]) -> Result<Option<usize>, Error> {
        match self {
            Self::LengthPrefixed => {
                Ok(read_u16(bytes, 0).map(|size| size as usize + LENGTH_PREFIX_SIZE))
            }
            Self::Stun => {
                if bytes.len() < 4 {
                    return Ok(None);
                }

                if ChannelData::is_channel_data(bytes) {
                    ChannelData::message_size(bytes, true).map(Some)
                } else {
                    stun::message_size(bytes).map(Some)
                }
            }
        }
    }

    /// Splits the first complete packet off `bytes`, without its length
    /// prefix, returning it and the number of bytes consumed.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::framing::Framing;
    ///
    /// let stream = [0x00, 0x02, 0xaa, 0xbb, 0x00, 0x01];
    /// let (packet, consumed) = Framing::LengthPrefixed.split(&stream).unwrap().unwrap();
    ///
    /// assert_eq!(packet, &[0xaa, 0xbb]);
    /// assert_eq!(consumed, 4);
    /// assert_eq!(Framing::LengthPrefixed.split(&stream[consumed..]), Ok(None));
    /// ```
    pub fn split<'a>(&self, bytes: &'a [u8]) -> Result<Option<(&'a [u8], usize)>, Error> {
        let Some(size) = self.packet_size(bytes)? else {
            return Ok(None);
        };

        if bytes.len() < size {
            return Ok(None);
        }

        Ok(Some(match self {
            Self::LengthPrefixed => (&bytes[LENGTH_PREFIX_SIZE..size], size),
            Self::Stun => (&bytes[..size], size),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stun_framing_rejects_rtp_first_byte() {
        assert_eq!(Framing::Stun.packet_size(&[0x80, 0x60, 0x00, 0x01]), Err(Error::InvalidInput));
        assert_eq!(Framing::Stun.packet_size(&[0x80, 0x60]), Ok(None));
    }

    #[test]
    fn channel_data_padding_is_consumed() {
        let stream = [0x40, 0x01, 0x00, 0x01, 0xaa, 0x00, 0x00, 0x00, 0x40, 0x01];
        let (packet, consumed) = Framing::Stun.split(&stream).unwrap().unwrap();

        assert_eq!(consumed, 8);
        assert_eq!(ChannelData::decode(packet).unwrap().as_bytes(), &[0xaa]);
        assert_eq!(Framing::Stun.split(&stream[consumed..]), Ok(None));
    }

    #[test]
    fn incomplete_packet_waits() {
        assert_eq!(Framing::LengthPrefixed.split(&[0x00, 0x04, 0x01]), Ok(None));
        assert_eq!(Framing::LengthPrefixed.split(&[0x00, 0x00]), Ok(Some((&[][..], 2))));
    }
}
