//! Primitive types used in the Kafka protocol
//!
//! Fixed-width integers are big-endian. Compact lengths are the logical
//! length plus one, with 0 meaning null and 1 meaning empty. Varints are
//! little-endian LEB128; the signed form is zig-zag encoded.

use anyhow::Result;
use bytes::{Buf, BufMut, Bytes};
use uuid::Uuid;

use crate::codec::{Decodable, Encodable};
use crate::error::DecodeError;

// --- Implementations for primitive integer types ---

macro_rules! impl_codec_for_int {
    ($($t:ty),*) => {
        $(
            impl Encodable for $t {
                fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
                    buf.put(self.to_be_bytes().as_ref());
                    Ok(())
                }
            }

            impl Decodable for $t {
                fn decode(buf: &mut impl Buf) -> Result<Self> {
                    const WIDTH: usize = std::mem::size_of::<$t>();
                    if buf.remaining() < WIDTH {
                        return Err(DecodeError::UnexpectedEof.into());
                    }
                    let mut bytes = [0u8; WIDTH];
                    buf.copy_to_slice(&mut bytes);
                    Ok(<$t>::from_be_bytes(bytes))
                }
            }
        )*
    };
}

impl_codec_for_int!(i8, i16, i32, i64, u8, u16, u32, u64);

// --- Uuid ---

impl Encodable for Uuid {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        buf.put_slice(self.as_bytes());
        Ok(())
    }
}

impl Decodable for Uuid {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < 16 {
            return Err(DecodeError::UnexpectedEof.into());
        }
        let mut bytes = [0u8; 16];
        buf.copy_to_slice(&mut bytes);
        Ok(Uuid::from_bytes(bytes))
    }
}

// --- Varint / Uvarint ---

/// Maximum encoded width of a varint; a u64 needs at most ten 7-bit groups.
const MAX_VARINT_LEN: usize = 10;

pub fn encode_uvarint(mut n: u64, buf: &mut impl BufMut) {
    loop {
        let b = (n & 0x7f) as u8;
        n >>= 7;
        if n == 0 {
            buf.put_u8(b);
            return;
        }
        buf.put_u8(b | 0x80);
    }
}

pub fn decode_uvarint(buf: &mut impl Buf) -> Result<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(DecodeError::UnexpectedEof.into());
        }
        let b = buf.get_u8();
        value |= ((b & 0x7f) as u64) << (7 * i);
        if b & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(DecodeError::VarintOverflow.into())
}

pub fn encode_varint(n: i64, buf: &mut impl BufMut) {
    let zigzag = ((n << 1) ^ (n >> 63)) as u64;
    encode_uvarint(zigzag, buf);
}

pub fn decode_varint(buf: &mut impl Buf) -> Result<i64> {
    let zigzag = decode_uvarint(buf)?;
    Ok(((zigzag >> 1) as i64) ^ -((zigzag & 1) as i64))
}

// --- KafkaBool ---

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct KafkaBool(pub bool);

impl Encodable for KafkaBool {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        (self.0 as i8).encode(buf)
    }
}

impl Decodable for KafkaBool {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        Ok(KafkaBool(i8::decode(buf)? != 0))
    }
}

impl From<bool> for KafkaBool {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

// --- NullableString ---

/// Legacy nullable string: INT16 length then bytes, -1 meaning null.
///
/// Only the request header's clientId still uses this form; flexible request
/// bodies use [`CompactString`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NullableString(pub Option<String>);

impl Encodable for NullableString {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        match &self.0 {
            Some(s) => {
                (s.len() as i16).encode(buf)?;
                buf.put_slice(s.as_bytes());
            }
            None => (-1i16).encode(buf)?,
        }
        Ok(())
    }
}

impl Decodable for NullableString {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let len = i16::decode(buf)?;
        if len < 0 {
            return Ok(NullableString(None));
        }
        let len = len as usize;
        if buf.remaining() < len {
            return Err(DecodeError::UnexpectedEof.into());
        }
        let mut bytes = vec![0; len];
        buf.copy_to_slice(&mut bytes);
        Ok(NullableString(Some(
            String::from_utf8_lossy(&bytes).into_owned(),
        )))
    }
}

impl From<Option<String>> for NullableString {
    fn from(s: Option<String>) -> Self {
        Self(s)
    }
}

impl From<&str> for NullableString {
    fn from(s: &str) -> Self {
        Self(Some(s.to_string()))
    }
}

// --- CompactString ---

/// Compact string: UVARINT(len + 1) then bytes, length 0 meaning null.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CompactString(pub Option<String>);

impl CompactString {
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl Encodable for CompactString {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        match &self.0 {
            Some(s) => {
                encode_uvarint(s.len() as u64 + 1, buf);
                buf.put_slice(s.as_bytes());
            }
            None => encode_uvarint(0, buf),
        }
        Ok(())
    }
}

impl Decodable for CompactString {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let len = decode_uvarint(buf)?;
        if len == 0 {
            return Ok(CompactString(None));
        }
        let len = (len - 1) as usize;
        if buf.remaining() < len {
            return Err(DecodeError::UnexpectedEof.into());
        }
        let mut bytes = vec![0; len];
        buf.copy_to_slice(&mut bytes);
        Ok(CompactString(Some(
            String::from_utf8_lossy(&bytes).into_owned(),
        )))
    }
}

impl From<&str> for CompactString {
    fn from(s: &str) -> Self {
        Self(Some(s.to_string()))
    }
}

impl From<String> for CompactString {
    fn from(s: String) -> Self {
        Self(Some(s))
    }
}

// --- CompactBytes ---

/// Compact byte array: UVARINT(len + 1) then bytes, length 0 meaning null.
///
/// Fetch's `records` field (COMPACT_RECORDS) uses this framing around raw
/// record-batch bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CompactBytes(pub Option<Bytes>);

impl CompactBytes {
    /// Present-but-empty, the single byte `0x01` on the wire.
    pub fn empty() -> Self {
        Self(Some(Bytes::new()))
    }
}

impl Encodable for CompactBytes {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        match &self.0 {
            Some(bytes) => {
                encode_uvarint(bytes.len() as u64 + 1, buf);
                buf.put_slice(bytes);
            }
            None => encode_uvarint(0, buf),
        }
        Ok(())
    }
}

impl Decodable for CompactBytes {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let len = decode_uvarint(buf)?;
        if len == 0 {
            return Ok(CompactBytes(None));
        }
        let len = (len - 1) as usize;
        if buf.remaining() < len {
            return Err(DecodeError::UnexpectedEof.into());
        }
        Ok(CompactBytes(Some(buf.copy_to_bytes(len))))
    }
}

impl From<Bytes> for CompactBytes {
    fn from(bytes: Bytes) -> Self {
        Self(Some(bytes))
    }
}

// --- CompactArray ---

/// Compact array: UVARINT(n + 1) then n elements, length 0 meaning null.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompactArray<T>(pub Option<Vec<T>>);

impl<T> CompactArray<T> {
    pub fn as_slice(&self) -> &[T] {
        self.0.as_deref().unwrap_or(&[])
    }
}

impl<T> Default for CompactArray<T> {
    fn default() -> Self {
        Self(Some(Vec::new()))
    }
}

impl<T> From<Vec<T>> for CompactArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self(Some(items))
    }
}

impl<T: Encodable> Encodable for CompactArray<T> {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        match &self.0 {
            Some(items) => {
                encode_uvarint(items.len() as u64 + 1, buf);
                for item in items {
                    item.encode(buf)?;
                }
            }
            None => encode_uvarint(0, buf),
        }
        Ok(())
    }
}

impl<T: Decodable> Decodable for CompactArray<T> {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let len = decode_uvarint(buf)?;
        if len == 0 {
            return Ok(CompactArray(None));
        }
        let len = (len - 1) as usize;
        let mut items = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            items.push(T::decode(buf)?);
        }
        Ok(CompactArray(Some(items)))
    }
}

// --- TaggedFields ---

/// The tagged-field trailer carried by every flexible schema.
///
/// This broker neither emits nor understands any tagged field: reads require
/// a zero count, writes emit the single byte `0x00`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TaggedFields;

impl Encodable for TaggedFields {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        encode_uvarint(0, buf);
        Ok(())
    }
}

impl Decodable for TaggedFields {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let count = decode_uvarint(buf)?;
        if count != 0 {
            return Err(DecodeError::UnsupportedTaggedField(count).into());
        }
        Ok(TaggedFields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn encoded<T: Encodable>(value: &T) -> Bytes {
        let mut buf = BytesMut::new();
        value.encode(&mut buf).unwrap();
        buf.freeze()
    }

    #[test]
    fn int_decode_checks_remaining() {
        let mut short = Bytes::from_static(&[0, 0, 1]);
        let err = i32::decode(&mut short).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DecodeError>(),
            Some(&DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn uuid_roundtrip() {
        let id = Uuid::from_bytes([
            0, 0, 0, 0, 0, 0, 0x40, 0, 0x80, 0, 0, 0, 0, 0, 0, 0x91,
        ]);
        let mut buf = encoded(&id);
        assert_eq!(buf.len(), 16);
        assert_eq!(Uuid::decode(&mut buf).unwrap(), id);
    }

    #[test]
    fn uvarint_known_values() {
        for (value, bytes) in [
            (0u64, &[0x00u8][..]),
            (1, &[0x01][..]),
            (127, &[0x7f][..]),
            (128, &[0x80, 0x01][..]),
            (300, &[0xac, 0x02][..]),
            (16383, &[0xff, 0x7f][..]),
            (16384, &[0x80, 0x80, 0x01][..]),
        ] {
            let mut buf = BytesMut::new();
            encode_uvarint(value, &mut buf);
            assert_eq!(&buf[..], bytes, "encoding {}", value);
            assert_eq!(decode_uvarint(&mut buf.freeze()).unwrap(), value);
        }
    }

    #[test]
    fn uvarint_overflow_after_ten_continuations() {
        let mut buf = Bytes::from_static(&[0x80; 11]);
        let err = decode_uvarint(&mut buf).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DecodeError>(),
            Some(&DecodeError::VarintOverflow)
        );
    }

    #[test]
    fn uvarint_truncated_is_eof() {
        let mut buf = Bytes::from_static(&[0x80, 0x80]);
        let err = decode_uvarint(&mut buf).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DecodeError>(),
            Some(&DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn varint_zigzag_known_values() {
        for (value, bytes) in [
            (0i64, &[0x00u8][..]),
            (-1, &[0x01][..]),
            (1, &[0x02][..]),
            (-2, &[0x03][..]),
            (29, &[0x3a][..]),
            (
                i64::MIN,
                &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01][..],
            ),
        ] {
            let mut buf = BytesMut::new();
            encode_varint(value, &mut buf);
            assert_eq!(&buf[..], bytes, "encoding {}", value);
            assert_eq!(decode_varint(&mut buf.freeze()).unwrap(), value);
        }
    }

    #[test]
    fn compact_string_null_and_empty_are_distinct() {
        assert_eq!(&encoded(&CompactString(None))[..], &[0x00]);
        assert_eq!(&encoded(&CompactString::from(""))[..], &[0x01]);

        let mut null = Bytes::from_static(&[0x00]);
        assert_eq!(CompactString::decode(&mut null).unwrap().0, None);
        let mut empty = Bytes::from_static(&[0x01]);
        assert_eq!(
            CompactString::decode(&mut empty).unwrap().0,
            Some(String::new())
        );
    }

    #[test]
    fn compact_string_roundtrip() {
        let value = CompactString::from("metadata.version");
        let mut buf = encoded(&value);
        assert_eq!(buf[0], 17);
        assert_eq!(CompactString::decode(&mut buf).unwrap(), value);
    }

    #[test]
    fn compact_bytes_empty_is_one_byte() {
        assert_eq!(&encoded(&CompactBytes::empty())[..], &[0x01]);
    }

    #[test]
    fn compact_array_roundtrip() {
        let value = CompactArray::from(vec![1i32, 2, 3]);
        let mut buf = encoded(&value);
        assert_eq!(buf[0], 4);
        assert_eq!(CompactArray::<i32>::decode(&mut buf).unwrap(), value);

        let mut null = Bytes::from_static(&[0x00]);
        assert_eq!(CompactArray::<i32>::decode(&mut null).unwrap().0, None);
    }

    #[test]
    fn nullable_string_legacy_null_marker() {
        assert_eq!(&encoded(&NullableString(None))[..], &[0xff, 0xff]);
        let mut buf = Bytes::from_static(&[0xff, 0xff]);
        assert_eq!(NullableString::decode(&mut buf).unwrap().0, None);

        let mut buf = encoded(&NullableString::from("kafka-cli"));
        assert_eq!(&buf[..2], &[0x00, 0x09]);
        assert_eq!(
            NullableString::decode(&mut buf).unwrap().0.as_deref(),
            Some("kafka-cli")
        );
    }

    #[test]
    fn tagged_fields_require_zero_count() {
        assert_eq!(&encoded(&TaggedFields)[..], &[0x00]);

        let mut ok = Bytes::from_static(&[0x00]);
        TaggedFields::decode(&mut ok).unwrap();

        let mut tagged = Bytes::from_static(&[0x01, 0x00, 0x00]);
        let err = TaggedFields::decode(&mut tagged).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DecodeError>(),
            Some(&DecodeError::UnsupportedTaggedField(1))
        );
    }
}
