use anyhow::Result;
use num_derive::{FromPrimitive, ToPrimitive};

use crate::codec::{Decodable, Encodable};
use crate::error::DecodeError;

/// The request apis this broker serves.
///
/// Decoding any other key fails; the connection loop logs the raw id and
/// closes the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Default)]
pub enum ApiKey {
    Fetch = 1,
    #[default]
    ApiVersions = 18,
    DescribeTopicPartitions = 75,
}

impl Encodable for ApiKey {
    fn encode(&self, buf: &mut impl bytes::BufMut) -> Result<()> {
        (*self as i16).encode(buf)
    }
}

impl Decodable for ApiKey {
    fn decode(buf: &mut impl bytes::Buf) -> Result<Self> {
        let key = i16::decode(buf)?;
        num_traits::FromPrimitive::from_i16(key)
            .ok_or_else(|| DecodeError::UnknownApiKey(key).into())
    }
}
