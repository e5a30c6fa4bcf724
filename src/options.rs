use bytes::Bytes;
use codec::{
    Error,
    demux::{is_dtls_packet, is_rtcp_packet},
    frame::locate,
    rtp::{self, abs_send_time_now, rewrite_abs_send_time},
    srtp::{self, AUTH_TAG_LENGTH_80},
};

/// Per-send instructions from the transport layer.
///
/// Nothing here outlives the send it was built for; the transport hands a
/// fresh value (or a clone of a configured default) to every
/// [`apply_packet_options`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketOptions {
    /// Id of the abs-send-time element in the one-byte extension block.
    pub rtp_extension_id: Option<u8>,
    /// 24-bit abs-send-time value; the current wall-clock time is used when
    /// this is not set.
    pub abs_send_time: Option<u32>,
    /// SRTP authentication key; no tag is written when this is not set.
    pub auth_key: Option<Bytes>,
    /// Length of the reserved tag trailer at the end of the rtp packet.
    pub auth_tag_length: usize,
    pub rollover_counter: u32,
}

impl Default for PacketOptions {
    fn default() -> Self {
        Self {
            rtp_extension_id: None,
            abs_send_time: None,
            auth_key: None,
            auth_tag_length: AUTH_TAG_LENGTH_80,
            rollover_counter: 0,
        }
    }
}

impl PacketOptions {
    pub fn with_abs_send_time(mut self, extension_id: u8, abs_send_time: Option<u32>) -> Self {
        self.rtp_extension_id = Some(extension_id);
        self.abs_send_time = abs_send_time;
        self
    }

    pub fn with_auth(mut self, key: impl Into<Bytes>, tag_length: usize, rollover_counter: u32) -> Self {
        self.auth_key = Some(key.into());
        self.auth_tag_length = tag_length;
        self.rollover_counter = rollover_counter;
        self
    }

    /// Whether these options ask for any change to the packet at all.
    pub fn is_noop(&self) -> bool {
        self.rtp_extension_id.is_none() && self.auth_key.is_none()
    }
}

/// Applies `options` to an outgoing packet in place.
///
/// The rtp packet is located inside whatever framing it travels in, its
/// abs-send-time element is rewritten, and then the authentication tag is
/// written over the rewritten bytes.  DTLS records and RTCP packets are
/// refused with [`Error::NotRtpLike`], as is anything else that does not
/// carry a complete rtp header; the caller sends such packets unmodified.
///
/// Returns whether the abs-send-time element was found and written.
///
/// # Test
///
/// ```
/// use rtp_relay::options::{PacketOptions, apply_packet_options};
///
/// let mut packet = vec![
///     0x90, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0xca, 0xfe, 0xba, 0xbe,
///     0xbe, 0xde, 0x00, 0x01, 0x32, 0x00, 0x00, 0x00,
/// ];
///
/// let options = PacketOptions::default().with_abs_send_time(3, Some(0x00abcdef));
///
/// assert_eq!(apply_packet_options(&mut packet, &options), Ok(true));
/// assert_eq!(&packet[17..20], &[0xab, 0xcd, 0xef]);
/// ```
pub fn apply_packet_options(packet: &mut [u8], options: &PacketOptions) -> Result<bool, Error> {
    if options.is_noop() {
        return Ok(false);
    }

    if is_dtls_packet(packet) {
        return Err(Error::NotRtpLike);
    }

    // byte 1 of a framed packet is part of the framing, so the rtcp check
    // only looks at the located rtp packet.
    let location = locate(packet)?;
    let rtp = &mut packet[location.range()];
    if is_rtcp_packet(rtp) {
        return Err(Error::NotRtpLike);
    }

    let header = rtp::validate(rtp)?;

    let mut found = false;
    if let Some(extension_id) = options.rtp_extension_id {
        let abs_send_time = options.abs_send_time.unwrap_or_else(abs_send_time_now);

        found = rewrite_abs_send_time(rtp, &header, extension_id, abs_send_time);
        if !found {
            log::trace!(
                "abs-send-time extension not found: id={}, kind={:?}",
                extension_id,
                location.kind
            );
        }
    }

    // the tag covers the rewritten extension, so it has to come last.
    if let Some(key) = &options.auth_key {
        let length = rtp.len();
        srtp::sign(rtp, length, key, options.auth_tag_length, options.rollover_counter);
    }

    Ok(found)
}
