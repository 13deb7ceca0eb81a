//! Typed KRaft metadata records
//!
//! A metadata record's value bytes open with a `(frameVersion, type,
//! version)` triplet; the type selects which schema follows. Only the three
//! types this broker consumes are decoded.

use anyhow::Result;
use bytes::Buf;
use uuid::Uuid;

use franz_protocol::primitives::{CompactArray, CompactString, TaggedFields};
use franz_protocol::{Decodable, DecodeError};

/// The leading triplet of every metadata record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRecord {
    pub frame_version: i8,
    pub record_type: i8,
    pub version: i8,
}

impl Decodable for BaseRecord {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let frame_version = i8::decode(buf)?;
        let record_type = i8::decode(buf)?;
        let version = i8::decode(buf)?;
        Ok(Self {
            frame_version,
            record_type,
            version,
        })
    }
}

/// TopicRecord (type 2): a topic name bound to its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRecord {
    pub name: String,
    pub topic_id: Uuid,
}

impl Decodable for TopicRecord {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let name = CompactString::decode(buf)?.0.unwrap_or_default();
        let topic_id = Uuid::decode(buf)?;
        TaggedFields::decode(buf)?;
        Ok(Self { name, topic_id })
    }
}

/// PartitionRecord (type 3): one partition's replica assignment and epochs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRecord {
    pub partition_id: i32,
    pub topic_id: Uuid,
    pub replicas: Vec<i32>,
    pub isr: Vec<i32>,
    pub removing_replicas: Vec<i32>,
    pub adding_replicas: Vec<i32>,
    pub leader: i32,
    pub leader_epoch: i32,
    pub partition_epoch: i32,
    pub directories: Vec<Uuid>,
}

impl Decodable for PartitionRecord {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let partition_id = i32::decode(buf)?;
        let topic_id = Uuid::decode(buf)?;
        let replicas = CompactArray::<i32>::decode(buf)?.0.unwrap_or_default();
        let isr = CompactArray::<i32>::decode(buf)?.0.unwrap_or_default();
        let removing_replicas = CompactArray::<i32>::decode(buf)?.0.unwrap_or_default();
        let adding_replicas = CompactArray::<i32>::decode(buf)?.0.unwrap_or_default();
        let leader = i32::decode(buf)?;
        let leader_epoch = i32::decode(buf)?;
        let partition_epoch = i32::decode(buf)?;
        let directories = CompactArray::<Uuid>::decode(buf)?.0.unwrap_or_default();
        TaggedFields::decode(buf)?;
        Ok(Self {
            partition_id,
            topic_id,
            replicas,
            isr,
            removing_replicas,
            adding_replicas,
            leader,
            leader_epoch,
            partition_epoch,
            directories,
        })
    }
}

/// FeatureLevelRecord (type 12): the finalized level of a named feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLevelRecord {
    pub name: String,
    pub feature_level: i16,
}

impl Decodable for FeatureLevelRecord {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let name = CompactString::decode(buf)?.0.unwrap_or_default();
        let feature_level = i16::decode(buf)?;
        TaggedFields::decode(buf)?;
        Ok(Self {
            name,
            feature_level,
        })
    }
}

/// A decoded metadata record value, keyed by the base record's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataRecord {
    Topic(TopicRecord),
    Partition(PartitionRecord),
    FeatureLevel(FeatureLevelRecord),
}

impl MetadataRecord {
    /// Decode a record's value bytes into a typed record.
    ///
    /// Types other than Topic (2), Partition (3) and FeatureLevel (12)
    /// surface [`DecodeError::UnknownRecordType`].
    pub fn decode(value: &[u8]) -> Result<Self> {
        let mut buf = value;
        let base = BaseRecord::decode(&mut buf)?;
        match base.record_type {
            2 => Ok(MetadataRecord::Topic(TopicRecord::decode(&mut buf)?)),
            3 => Ok(MetadataRecord::Partition(PartitionRecord::decode(&mut buf)?)),
            12 => Ok(MetadataRecord::FeatureLevel(FeatureLevelRecord::decode(
                &mut buf,
            )?)),
            other => Err(DecodeError::UnknownRecordType(other).into()),
        }
    }
}
