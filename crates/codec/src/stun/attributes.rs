use crate::read_u16;

use super::alignment_32;

/// STUN attribute types this crate needs to recognise.
#[repr(u16)]
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub enum AttributeType {
    Data = 0x0013,
}

/// A single attribute borrowed out of a STUN message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAttribute<'a> {
    pub kind: u16,
    /// Offset of the value inside the buffer the cursor was created over.
    pub offset: usize,
    pub value: &'a [u8],
}

/// A bounds-checked walk over STUN attributes.
///
/// Each attribute is a `(type, length, value, padding)` TLV.  The cursor
/// only moves forward after the declared length has been checked against
/// the remaining bytes, and it stops for good on the first attribute that
/// does not fit, so a truncated or hostile message yields a short sequence
/// rather than a panic.  Use [`AttributeCursor::is_truncated`] to tell a
/// clean end from a malformed one.
///
/// # Test
///
/// ```
/// use rtp_relay_codec::stun::attributes::AttributeCursor;
///
/// let body = [
///     0x00, 0x06, 0x00, 0x05, b'p', b'a', b'n', b'd', b'a', 0x00, 0x00, 0x00,
///     0x00, 0x13, 0x00, 0x02, 0xaa, 0xbb, 0x00, 0x00,
/// ];
///
/// let mut cursor = AttributeCursor::new(&body, 0);
/// let first = cursor.next().unwrap();
/// let second = cursor.next().unwrap();
///
/// assert_eq!(first.kind, 0x0006);
/// assert_eq!(first.value, b"panda");
/// assert_eq!(second.kind, 0x0013);
/// assert_eq!(second.offset, 16);
/// assert_eq!(second.value, &[0xaa, 0xbb]);
/// assert!(cursor.next().is_none());
/// assert!(!cursor.is_truncated());
/// ```
pub struct AttributeCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    truncated: bool,
}

impl<'a> AttributeCursor<'a> {
    /// Starts walking `bytes` at `offset`.  Offsets reported by the cursor
    /// are relative to `bytes`, not to `offset`.
    pub fn new(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            offset,
            truncated: false,
        }
    }

    /// True once an attribute header or value ran past the buffer.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Finds the first attribute of `kind`.
    pub fn find_attribute(mut self, kind: AttributeType) -> Option<RawAttribute<'a>> {
        Iterator::find(&mut self, |it| it.kind == kind as u16)
    }
}

impl<'a> Iterator for AttributeCursor<'a> {
    type Item = RawAttribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.truncated || self.offset >= self.bytes.len() {
            return None;
        }

        let (Some(kind), Some(size)) = (
            read_u16(self.bytes, self.offset),
            read_u16(self.bytes, self.offset + 2),
        ) else {
            self.truncated = true;
            return None;
        };

        let start = self.offset + 4;
        let size = size as usize;
        if self.bytes.len() - start < size {
            self.truncated = true;
            return None;
        }

        // padding may be absent on the very last attribute.
        self.offset = (start + size + alignment_32(size)).min(self.bytes.len());

        Some(RawAttribute {
            kind,
            offset: start,
            value: &self.bytes[start..start + size],
        })
    }
}
