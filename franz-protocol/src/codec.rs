//! Traits for encoding and decoding Kafka protocol messages

use anyhow::Result;
use bytes::{Buf, BufMut};

/// A type that can be encoded into a buffer.
///
/// Implementors write their exact wire representation into the buffer;
/// callers are responsible for any outer length prefix.
pub trait Encodable {
    /// Encode a value into a buffer.
    fn encode(&self, buf: &mut impl BufMut) -> Result<()>;
}

/// A type that can be decoded from a buffer.
///
/// Implementors must consume exactly the encoded width of the value, so that
/// the cursor lands on the next field.
pub trait Decodable: Sized {
    /// Decode a value from a buffer.
    fn decode(buf: &mut impl Buf) -> Result<Self>;
}
