use aws_lc_rs::hmac;

/// Size in bytes of an HMAC-SHA1 digest.
pub const HMAC_SHA1_LEN: usize = 20;

/// HMAC SHA1 digest over the concatenation of `source`.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::crypto::hmac_sha1;
///
/// // RFC 2202, test case 1.
/// let key = [0x0bu8; 20];
///
/// let sign = [
///     0xb6u8, 0x17, 0x31, 0x86, 0x55, 0x05, 0x72, 0x64, 0xe2, 0x8b, 0xc0,
///     0xb6, 0xfb, 0x37, 0x8c, 0x8e, 0xf1, 0x46, 0xbe, 0x00,
/// ];
///
/// assert_eq!(hmac_sha1(&key, &[b"Hi ", b"There"]), sign);
/// ```
pub fn hmac_sha1(key: &[u8], source: &[&[u8]]) -> [u8; HMAC_SHA1_LEN] {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key);
    let mut ctx = hmac::Context::with_key(&key);

    for buf in source {
        ctx.update(buf);
    }

    let signature = ctx.sign();
    let mut result = [0u8; HMAC_SHA1_LEN];
    result.copy_from_slice(signature.as_ref());
    result
}
