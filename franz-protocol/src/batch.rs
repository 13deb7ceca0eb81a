//! On-disk record batch framing (magic v2)
//!
//! A log segment is a plain concatenation of these frames. Decoding walks
//! records sequentially; `batch_length` is retained but not used to skip,
//! and the record array is prefixed by a plain INT32 count, not a compact
//! length. The CRC is read and kept but never verified.

use anyhow::Result;
use bytes::{Buf, Bytes};

use crate::error::DecodeError;
use crate::primitives::{decode_uvarint, decode_varint};
use crate::Decodable;

/// One record header inside a [`Record`].
///
/// Both the key and the value are varint-length byte blocks, -1 meaning
/// null, the same framing as the record's own key and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub key: Option<String>,
    pub value: Option<Bytes>,
}

impl Decodable for RecordHeader {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let key = decode_varint_bytes(buf)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
        let value = decode_varint_bytes(buf)?;
        Ok(Self { key, value })
    }
}

/// One record inside a [`RecordBatch`].
///
/// Key and value use varint lengths with -1 meaning null; the header count
/// is a plain UVARINT, 0 meaning no headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub length: i64,
    pub attributes: i8,
    pub timestamp_delta: i64,
    pub offset_delta: i64,
    pub key: Option<Bytes>,
    pub value: Option<Bytes>,
    pub headers: Vec<RecordHeader>,
}

impl Decodable for Record {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let length = decode_varint(buf)?;
        let attributes = i8::decode(buf)?;
        let timestamp_delta = decode_varint(buf)?;
        let offset_delta = decode_varint(buf)?;
        let key = decode_varint_bytes(buf)?;
        let value = decode_varint_bytes(buf)?;

        let header_count = decode_uvarint(buf)?;
        let mut headers = Vec::with_capacity(header_count.min(64) as usize);
        for _ in 0..header_count {
            headers.push(RecordHeader::decode(buf)?);
        }

        Ok(Self {
            length,
            attributes,
            timestamp_delta,
            offset_delta,
            key,
            value,
            headers,
        })
    }
}

/// One on-disk record batch frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordBatch {
    pub base_offset: i64,
    pub batch_length: i32,
    pub partition_leader_epoch: i32,
    pub magic: i8,
    pub crc: i32,
    pub attributes: i16,
    pub last_offset_delta: i32,
    pub first_timestamp: i64,
    pub max_timestamp: i64,
    pub producer_id: i64,
    pub producer_epoch: i16,
    pub base_sequence: i32,
    pub records: Vec<Record>,
}

impl Decodable for RecordBatch {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let base_offset = i64::decode(buf)?;
        let batch_length = i32::decode(buf)?;
        let partition_leader_epoch = i32::decode(buf)?;
        let magic = i8::decode(buf)?;
        if magic != 2 {
            return Err(DecodeError::UnsupportedMagic(magic).into());
        }
        let crc = i32::decode(buf)?;
        let attributes = i16::decode(buf)?;
        let last_offset_delta = i32::decode(buf)?;
        let first_timestamp = i64::decode(buf)?;
        let max_timestamp = i64::decode(buf)?;
        let producer_id = i64::decode(buf)?;
        let producer_epoch = i16::decode(buf)?;
        let base_sequence = i32::decode(buf)?;

        let record_count = i32::decode(buf)?;
        if record_count < 0 {
            return Err(DecodeError::InvalidLength(record_count as i64).into());
        }
        let mut records = Vec::with_capacity(record_count.min(1024) as usize);
        for _ in 0..record_count {
            records.push(Record::decode(buf)?);
        }

        Ok(Self {
            base_offset,
            batch_length,
            partition_leader_epoch,
            magic,
            crc,
            attributes,
            last_offset_delta,
            first_timestamp,
            max_timestamp,
            producer_id,
            producer_epoch,
            base_sequence,
            records,
        })
    }
}

/// Varint-length byte block; -1 is null, anything below that is invalid.
fn decode_varint_bytes(buf: &mut impl Buf) -> Result<Option<Bytes>> {
    let len = decode_varint(buf)?;
    if len == -1 {
        return Ok(None);
    }
    if len < 0 {
        return Err(DecodeError::InvalidLength(len).into());
    }
    let len = len as usize;
    if buf.remaining() < len {
        return Err(DecodeError::UnexpectedEof.into());
    }
    Ok(Some(buf.copy_to_bytes(len)))
}
