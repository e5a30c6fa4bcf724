//! SRTP message authentication.
//!
//! [RFC3711]: https://tools.ietf.org/html/rfc3711#section-4.2
//!
//! Only the authentication step of [RFC3711] is done here: the packet is
//! expected to be encrypted already and to carry a reserved trailer for the
//! tag.  The rollover counter is an implicit input of the tag and is not
//! transmitted; it is staged in the trailer while the digest is computed.

use crate::{
    contract_violation,
    crypto::{HMAC_SHA1_LEN, hmac_sha1},
};

/// Size of the rollover counter appended to the authenticated bytes.
pub const ROC_SIZE: usize = 4;

/// Tag length of the HMAC_SHA1_80 profile.
pub const AUTH_TAG_LENGTH_80: usize = 10;

/// Tag length of the HMAC_SHA1_32 profile.
pub const AUTH_TAG_LENGTH_32: usize = 4;

/// Writes the truncated HMAC-SHA1 authentication tag of `rtp[..length]`.
///
/// The last `tag_length` bytes of `rtp[..length]` are a reserved
/// placeholder.  The rollover counter is staged at the start of that
/// placeholder (little-endian), the digest is taken over everything up to
/// and including the staged counter, and the first `tag_length` bytes of
/// the digest then replace the placeholder.
///
/// An empty key, a tag longer than the digest or shorter than the staged
/// counter, or a tag that does not fit in `length` are caller bugs: they
/// are logged and panic.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::srtp::{AUTH_TAG_LENGTH_80, sign};
///
/// let mut packet = vec![0x80, 0x60, 0x00, 0x01, 0, 0, 0, 1, 0xca, 0xfe, 0xba, 0xbe];
/// packet.extend(0u8..28);
/// packet.resize(40 + AUTH_TAG_LENGTH_80, 0xee);
///
/// let key = (1u8..=20).collect::<Vec<_>>();
/// let length = packet.len();
///
/// sign(&mut packet, length, &key, AUTH_TAG_LENGTH_80, 1);
///
/// assert_eq!(
///     &packet[40..],
///     &[0x2c, 0x4e, 0x82, 0x4e, 0x1d, 0xcc, 0xad, 0x4f, 0xc6, 0x30]
/// );
/// ```
pub fn sign(rtp: &mut [u8], length: usize, key: &[u8], tag_length: usize, rollover_counter: u32) {
    if key.is_empty() {
        contract_violation("srtp auth key is empty");
    }

    if tag_length > HMAC_SHA1_LEN {
        contract_violation("srtp auth tag is longer than the hmac-sha1 digest");
    }

    if tag_length < ROC_SIZE {
        contract_violation("srtp auth tag has no room for the rollover counter");
    }

    if length > rtp.len() || tag_length > length {
        contract_violation("srtp auth tag does not fit in the reserved space");
    }

    let tag_start = length - tag_length;
    let auth_length = tag_start + ROC_SIZE;

    rtp[tag_start..auth_length].copy_from_slice(&rollover_counter.to_le_bytes());
    let digest = hmac_sha1(key, &[&rtp[..auth_length]]);
    rtp[tag_start..length].copy_from_slice(&digest[..tag_length]);
}
