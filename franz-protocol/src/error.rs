//! Decode failure kinds for the wire codec

use thiserror::Error;

/// Reasons a wire-level decode can fail.
///
/// These travel inside `anyhow::Error`; callers that care about the kind
/// (the dispatch loop, tests) downcast to this type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes remained than the field requires.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A varint ran past its 10-byte maximum.
    #[error("varint exceeds 10 bytes")]
    VarintOverflow,

    /// A tagged-field block carried a non-zero entry count.
    #[error("unsupported tagged field count: {0}")]
    UnsupportedTaggedField(u64),

    /// The request header named an api key we do not serve.
    #[error("unknown api key: {0}")]
    UnknownApiKey(i16),

    /// A metadata record value named a type we do not decode.
    #[error("unknown metadata record type: {0}")]
    UnknownRecordType(i8),

    /// A record batch carried a magic byte other than 2.
    #[error("unsupported record batch magic: {0}")]
    UnsupportedMagic(i8),

    /// A length prefix was negative or otherwise impossible.
    #[error("invalid length: {0}")]
    InvalidLength(i64),
}
