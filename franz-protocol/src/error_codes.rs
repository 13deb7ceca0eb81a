//! Kafka protocol error codes

use anyhow::Result;
use bytes::BufMut;
use num_derive::{FromPrimitive, ToPrimitive};

use crate::codec::{Decodable, Encodable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(i16)]
pub enum ErrorCode {
    UnknownServerError = -1,
    None = 0,
    OffsetOutOfRange = 1,
    CorruptMessage = 2,
    UnknownTopicOrPartition = 3,
    InvalidFetchSize = 4,
    LeaderNotAvailable = 5,
    NotLeaderForPartition = 6,
    RequestTimedOut = 7,
    NetworkException = 13,
    InvalidTopicException = 17,
    TopicAuthorizationFailed = 29,
    UnsupportedVersion = 35,
    InvalidRequest = 42,
    UnknownTopicId = 100,
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::None
    }
}

impl Encodable for ErrorCode {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        (*self as i16).encode(buf)
    }
}

impl Decodable for ErrorCode {
    fn decode(buf: &mut impl bytes::Buf) -> Result<Self> {
        let code = i16::decode(buf)?;
        num_traits::FromPrimitive::from_i16(code)
            .ok_or_else(|| anyhow::anyhow!("unknown error code: {}", code))
    }
}
