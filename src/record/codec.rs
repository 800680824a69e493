use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::common::{EntityKind, RegistrarError, Result};

/// A record with a constant encoded width, stored back-to-back in a flat file.
///
/// ## Encoding contract
///
/// - `encode` always produces exactly `ENCODED_LEN` bytes.
/// - `decode(encode(r)) == r` for every record whose string fields fit their slots.
/// - String fields longer than their slot are truncated on encode. This is a lossy write,
///   not an error: use [`FixedRecord::normalized`] to see the value that will be stored.
/// - Numeric fields are 4-byte little-endian.
pub trait FixedRecord: Sized {
    /// Entity this record type belongs to (used in errors and logs)
    const ENTITY: EntityKind;

    /// Number of bytes one encoded record occupies on disk
    const ENCODED_LEN: usize;

    /// Appends exactly `ENCODED_LEN` bytes to the buffer.
    fn encode_into(&self, buf: &mut BytesMut);

    /// Reads one record from the front of `buf`. The caller guarantees
    /// at least `ENCODED_LEN` bytes are available.
    fn decode_from(buf: &mut &[u8]) -> Result<Self>;

    /// Serializes the record into a fresh fixed-size buffer.
    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::ENCODED_LEN);
        self.encode_into(&mut buf);
        debug_assert_eq!(buf.len(), Self::ENCODED_LEN);
        buf.freeze()
    }

    /// Deserializes a record from exactly `ENCODED_LEN` bytes.
    fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != Self::ENCODED_LEN {
            return Err(corrupt(
                Self::ENTITY,
                format!(
                    "expected {} bytes, got {}",
                    Self::ENCODED_LEN,
                    data.len()
                ),
            ));
        }
        let mut cursor = data;
        Self::decode_from(&mut cursor)
    }

    /// Returns the record as it reads back after a store round trip
    /// (string fields truncated to their slots).
    fn normalized(&self) -> Result<Self> {
        Self::decode(&self.encode())
    }
}

/// Returns the longest prefix of `value` that fits a NUL-terminated slot of `slot` bytes.
///
/// The cut never splits a UTF-8 character and stops at an embedded NUL, since the
/// decoder treats the first NUL as the end of the field.
pub fn fit_to_slot(value: &str, slot: usize) -> &str {
    let value = match value.find('\0') {
        Some(nul) => &value[..nul],
        None => value,
    };
    let capacity = slot.saturating_sub(1);
    if value.len() <= capacity {
        return value;
    }
    let mut end = capacity;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Writes a string into a zero-filled slot of `slot` bytes.
pub fn put_str(buf: &mut BytesMut, value: &str, slot: usize) {
    let bytes = fit_to_slot(value, slot).as_bytes();
    buf.put_slice(bytes);
    buf.put_bytes(0, slot - bytes.len());
}

/// Reads a string slot of `slot` bytes, stopping at the first NUL.
/// Never reads past the slot.
pub fn get_str(buf: &mut &[u8], slot: usize) -> String {
    let value = {
        let raw = &buf.chunk()[..slot];
        let end = raw.iter().position(|&b| b == 0).unwrap_or(slot);
        String::from_utf8_lossy(&raw[..end]).into_owned()
    };
    buf.advance(slot);
    value
}

pub fn put_i32(buf: &mut BytesMut, value: i32) {
    buf.put_i32_le(value);
}

pub fn get_i32(buf: &mut &[u8]) -> i32 {
    buf.get_i32_le()
}

pub fn put_f32(buf: &mut BytesMut, value: f32) {
    buf.put_f32_le(value);
}

pub fn get_f32(buf: &mut &[u8]) -> f32 {
    buf.get_f32_le()
}

pub(crate) fn corrupt(entity: EntityKind, reason: impl Into<String>) -> RegistrarError {
    RegistrarError::CorruptRecord {
        entity,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_to_slot_keeps_room_for_terminator() {
        assert_eq!(fit_to_slot("abc", 4), "abc");
        assert_eq!(fit_to_slot("abcd", 4), "abc");
        assert_eq!(fit_to_slot("", 4), "");
        assert_eq!(fit_to_slot("abc", 0), "");
    }

    #[test]
    fn test_fit_to_slot_respects_char_boundaries() {
        // 'é' is two bytes; a 3-byte slot has room for 2 content bytes
        assert_eq!(fit_to_slot("aé", 3), "a");
        assert_eq!(fit_to_slot("éa", 3), "é");
    }

    #[test]
    fn test_fit_to_slot_stops_at_nul() {
        assert_eq!(fit_to_slot("ab\0cd", 16), "ab");
    }

    #[test]
    fn test_str_slot_round_trip() {
        let mut buf = BytesMut::new();
        put_str(&mut buf, "EEE", 8);
        put_str(&mut buf, "overflowing", 4);
        assert_eq!(buf.len(), 12);
        assert_eq!(&buf[..8], b"EEE\0\0\0\0\0");

        let mut cursor = &buf[..];
        assert_eq!(get_str(&mut cursor, 8), "EEE");
        assert_eq!(get_str(&mut cursor, 4), "ove");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_get_str_without_terminator_stays_in_slot() {
        let data = b"ABCDxyz";
        let mut cursor = &data[..];
        assert_eq!(get_str(&mut cursor, 4), "ABCD");
        assert_eq!(cursor, b"xyz");
    }

    #[test]
    fn test_numeric_fields() {
        let mut buf = BytesMut::new();
        put_i32(&mut buf, 241);
        put_f32(&mut buf, 3.0);
        assert_eq!(buf.len(), 8);

        let mut cursor = &buf[..];
        assert_eq!(get_i32(&mut cursor), 241);
        assert_eq!(get_f32(&mut cursor), 3.0);
    }
}
