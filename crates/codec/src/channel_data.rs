use bytes::{BufMut, BytesMut};

use super::{Error, read_u16};

/// Size of the ChannelData header: channel number and length.
pub const HEADER_SIZE: usize = 4;

/// The ChannelData Message
///
/// The ChannelData message is used to carry application data between the
/// client and the server.
///
/// The Channel Number field specifies the number of the channel on which
/// the data is traveling, and thus, the address of the peer that is
/// sending or is to receive the data.
///
/// The Length field specifies the length in bytes of the application
/// data field (i.e., it does not include the size of the ChannelData
/// header).  Note that 0 is a valid length.
#[derive(Debug, Clone, Copy)]
pub struct ChannelData<'a> {
    pub number: u16,
    pub bytes: &'a [u8],
}

impl<'a> ChannelData<'a> {
    /// The first two bits of a ChannelData message are always `0b01`.
    #[inline]
    pub fn is_channel_data(bytes: &[u8]) -> bool {
        bytes.first().is_some_and(|it| it & 0xC0 == 0x40)
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    /// Application data, without the header and without any padding.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// On-wire size of the first ChannelData message in `bytes`.
    ///
    /// Over stream transports the message is padded to a multiple of four
    /// bytes, the padding is not covered by the length field.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::channel_data::ChannelData;
    ///
    /// let bytes = [0x40, 0x00, 0x00, 0x05, 1, 2, 3, 4, 5, 0, 0, 0];
    ///
    /// assert_eq!(ChannelData::message_size(&bytes, false).unwrap(), 9);
    /// assert_eq!(ChannelData::message_size(&bytes, true).unwrap(), 12);
    /// ```
    pub fn message_size(bytes: &[u8], is_tcp: bool) -> Result<usize, Error> {
        if !Self::is_channel_data(bytes) {
            return Err(Error::InvalidInput);
        }

        let mut size = read_u16(bytes, 2).ok_or(Error::InvalidInput)? as usize + HEADER_SIZE;
        if is_tcp && (size % 4) > 0 {
            size += 4 - (size % 4);
        }

        Ok(size)
    }

    /// # Test
    ///
    /// ```
    /// use bytes::BytesMut;
    /// use rtp_relay_codec::channel_data::ChannelData;
    ///
    /// let data: [u8; 4] = [0x80, 0x00, 0x00, 0x40];
    /// let mut bytes = BytesMut::with_capacity(1500);
    ///
    /// ChannelData {
    ///     number: 0x4001,
    ///     bytes: &data[..],
    /// }
    /// .encode(&mut bytes);
    ///
    /// assert_eq!(&bytes[..], &[0x40, 0x01, 0x00, 0x04, 0x80, 0x00, 0x00, 0x40]);
    /// ```
    pub fn encode(self, bytes: &mut BytesMut) {
        bytes.clear();
        bytes.put_u16(self.number);
        bytes.put_u16(self.bytes.len() as u16);
        bytes.extend_from_slice(self.bytes);
    }

    /// Decodes the ChannelData header and borrows exactly the declared
    /// application data. Trailing bytes (padding, or a following message on
    /// a stream) are not part of the result.
    ///
    /// # Test
    ///
    /// ```
    /// use rtp_relay_codec::channel_data::ChannelData;
    ///
    /// let bytes = [0x40, 0x01, 0x00, 0x02, 0xaa, 0xbb, 0x00, 0x00];
    /// let ret = ChannelData::decode(&bytes[..]).unwrap();
    ///
    /// assert_eq!(ret.number, 0x4001);
    /// assert_eq!(ret.bytes, &[0xaa, 0xbb]);
    ///
    /// // declared length runs past the buffer.
    /// assert!(ChannelData::decode(&[0x40, 0x01, 0x00, 0x09, 0xaa]).is_err());
    /// ```
    pub fn decode(bytes: &'a [u8]) -> Result<Self, Error> {
        if bytes.len() < HEADER_SIZE || !Self::is_channel_data(bytes) {
            return Err(Error::InvalidInput);
        }

        let number = read_u16(bytes, 0).ok_or(Error::InvalidInput)?;
        let size = read_u16(bytes, 2).ok_or(Error::InvalidInput)? as usize;
        if size > bytes.len() - HEADER_SIZE {
            return Err(Error::InvalidInput);
        }

        Ok(Self {
            bytes: &bytes[HEADER_SIZE..HEADER_SIZE + size],
            number,
        })
    }
}
