#[cfg(test)]
mod tests {
    use crate::codec::{Decodable, Encodable};
    use crate::primitives::{
        decode_uvarint, decode_varint, encode_uvarint, encode_varint, CompactArray,
        CompactString, NullableString,
    };
    use bytes::BytesMut;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn roundtrip<T: Encodable + Decodable + PartialEq + std::fmt::Debug>(value: &T) {
        let mut buf = BytesMut::new();
        value.encode(&mut buf).unwrap();
        let mut read = buf.freeze();
        let decoded = T::decode(&mut read).unwrap();
        assert_eq!(&decoded, value);
        assert_eq!(read.len(), 0, "decode must consume the full encoding");
    }

    proptest! {
        #[test]
        fn fixed_int_roundtrip(a in any::<i8>(), b in any::<i16>(), c in any::<i32>(), d in any::<i64>()) {
            roundtrip(&a);
            roundtrip(&b);
            roundtrip(&c);
            roundtrip(&d);
        }

        #[test]
        fn unsigned_int_roundtrip(a in any::<u32>(), b in any::<u64>()) {
            roundtrip(&a);
            roundtrip(&b);
        }

        #[test]
        fn uuid_roundtrip(bytes in any::<[u8; 16]>()) {
            roundtrip(&Uuid::from_bytes(bytes));
        }

        #[test]
        fn uvarint_roundtrip(value in any::<u64>()) {
            let mut buf = BytesMut::new();
            encode_uvarint(value, &mut buf);
            let encoded = buf.freeze();

            // At most ten bytes; every byte but the last carries the
            // continuation bit.
            prop_assert!(encoded.len() <= 10);
            for b in &encoded[..encoded.len() - 1] {
                prop_assert_eq!(b & 0x80, 0x80);
            }
            prop_assert_eq!(encoded[encoded.len() - 1] & 0x80, 0);

            let mut read = encoded;
            prop_assert_eq!(decode_uvarint(&mut read).unwrap(), value);
            prop_assert_eq!(read.len(), 0);
        }

        #[test]
        fn varint_roundtrip(value in any::<i64>()) {
            let mut buf = BytesMut::new();
            encode_varint(value, &mut buf);
            let mut read = buf.freeze();
            prop_assert_eq!(decode_varint(&mut read).unwrap(), value);
            prop_assert_eq!(read.len(), 0);
        }

        #[test]
        fn compact_string_roundtrip(value in proptest::option::of("[a-zA-Z0-9._-]{0,64}")) {
            roundtrip(&CompactString(value));
        }

        #[test]
        fn nullable_string_roundtrip(value in proptest::option::of("[a-zA-Z0-9._-]{0,64}")) {
            roundtrip(&NullableString(value));
        }

        #[test]
        fn compact_array_roundtrip(items in proptest::option::of(proptest::collection::vec(any::<i32>(), 0..64))) {
            roundtrip(&CompactArray(items));
        }
    }
}
