//! Kafka protocol message types
//!
//! All three served apis are flexible schemas: compact lengths everywhere
//! and a tagged-field trailer on every structure. The one legacy holdout is
//! the request header's clientId, which stays INT16-length nullable.

use anyhow::Result;
use bytes::{Buf, BufMut};
use uuid::Uuid;

use crate::error::DecodeError;
use crate::error_codes::ErrorCode;
use crate::primitives::{
    CompactArray, CompactBytes, CompactString, KafkaBool, NullableString, TaggedFields,
};
use crate::{ApiKey, Decodable, Encodable};

/// A Kafka protocol request header (v2)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RequestHeader {
    /// The API key of this request
    pub api_key: ApiKey,
    /// The API version of this request
    pub api_version: i16,
    /// The correlation ID of this request
    pub correlation_id: i32,
    /// The client ID string (legacy nullable encoding)
    pub client_id: NullableString,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for RequestHeader {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.api_key.encode(buf)?;
        self.api_version.encode(buf)?;
        self.correlation_id.encode(buf)?;
        self.client_id.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for RequestHeader {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let api_key = ApiKey::decode(buf)?;
        let api_version = i16::decode(buf)?;
        let correlation_id = i32::decode(buf)?;
        let client_id = NullableString::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;

        Ok(Self {
            api_key,
            api_version,
            correlation_id,
            client_id,
            _tagged_fields,
        })
    }
}

/// A Kafka protocol response header (v0)
///
/// ApiVersions responses use this header even though their body is flexible;
/// clients must be able to parse the header before they know which versions
/// the broker speaks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResponseHeader {
    /// The correlation ID of this response
    pub correlation_id: i32,
}

impl Encodable for ResponseHeader {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.correlation_id.encode(buf)
    }
}

impl Decodable for ResponseHeader {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let correlation_id = i32::decode(buf)?;
        Ok(Self { correlation_id })
    }
}

/// A Kafka protocol response header (flexible / v1)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ResponseHeaderFlexible {
    pub correlation_id: i32,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for ResponseHeaderFlexible {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.correlation_id.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for ResponseHeaderFlexible {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let correlation_id = i32::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            correlation_id,
            _tagged_fields,
        })
    }
}

// --- ApiVersions (key 18) ---

/// ApiVersions request (v3+)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiVersionsRequest {
    pub client_software_name: CompactString,
    pub client_software_version: CompactString,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for ApiVersionsRequest {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.client_software_name.encode(buf)?;
        self.client_software_version.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for ApiVersionsRequest {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let client_software_name = CompactString::decode(buf)?;
        let client_software_version = CompactString::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            client_software_name,
            client_software_version,
            _tagged_fields,
        })
    }
}

/// One (key, min, max) entry of an ApiVersions response (v3+)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiVersion {
    pub api_key: ApiKey,
    pub min_version: i16,
    pub max_version: i16,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for ApiVersion {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.api_key.encode(buf)?;
        self.min_version.encode(buf)?;
        self.max_version.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for ApiVersion {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let api_key = ApiKey::decode(buf)?;
        let min_version = i16::decode(buf)?;
        let max_version = i16::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            api_key,
            min_version,
            max_version,
            _tagged_fields,
        })
    }
}

/// ApiVersions response (v3+)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiVersionsResponseV3 {
    pub error_code: ErrorCode,
    pub api_keys: CompactArray<ApiVersion>,
    pub throttle_time_ms: i32,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for ApiVersionsResponseV3 {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.error_code.encode(buf)?;
        self.api_keys.encode(buf)?;
        self.throttle_time_ms.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for ApiVersionsResponseV3 {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let error_code = ErrorCode::decode(buf)?;
        let api_keys = CompactArray::<ApiVersion>::decode(buf)?;
        let throttle_time_ms = i32::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            error_code,
            api_keys,
            throttle_time_ms,
            _tagged_fields,
        })
    }
}

// --- DescribeTopicPartitions (key 75, v0) ---

/// One requested topic name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicRequest {
    pub name: CompactString,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for TopicRequest {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.name.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for TopicRequest {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let name = CompactString::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            name,
            _tagged_fields,
        })
    }
}

/// Pagination cursor shared between request and response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
    pub topic_name: CompactString,
    pub partition_index: i32,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for Cursor {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.topic_name.encode(buf)?;
        self.partition_index.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for Cursor {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let topic_name = CompactString::decode(buf)?;
        let partition_index = i32::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            topic_name,
            partition_index,
            _tagged_fields,
        })
    }
}

/// A nullable cursor. Null is the single byte `0xFF`, not a compact length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NullableCursor(pub Option<Cursor>);

impl Encodable for NullableCursor {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        match &self.0 {
            Some(cursor) => cursor.encode(buf),
            None => {
                buf.put_u8(0xff);
                Ok(())
            }
        }
    }
}

impl Decodable for NullableCursor {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let next = buf
            .chunk()
            .first()
            .copied()
            .ok_or(DecodeError::UnexpectedEof)?;
        if next == 0xff {
            buf.advance(1);
            return Ok(NullableCursor(None));
        }
        Ok(NullableCursor(Some(Cursor::decode(buf)?)))
    }
}

/// DescribeTopicPartitions request (v0)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeTopicPartitionsRequest {
    pub topics: CompactArray<TopicRequest>,
    pub response_partition_limit: i32,
    pub cursor: NullableCursor,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for DescribeTopicPartitionsRequest {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.topics.encode(buf)?;
        self.response_partition_limit.encode(buf)?;
        self.cursor.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for DescribeTopicPartitionsRequest {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let topics = CompactArray::<TopicRequest>::decode(buf)?;
        let response_partition_limit = i32::decode(buf)?;
        let cursor = NullableCursor::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            topics,
            response_partition_limit,
            cursor,
            _tagged_fields,
        })
    }
}

/// Per-partition entry of a DescribeTopicPartitions response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeTopicPartitionsPartition {
    pub error_code: ErrorCode,
    pub partition_index: i32,
    pub leader_id: i32,
    pub leader_epoch: i32,
    pub replica_nodes: CompactArray<i32>,
    pub isr_nodes: CompactArray<i32>,
    pub eligible_leader_replicas: CompactArray<i32>,
    pub last_known_elr: CompactArray<i32>,
    pub offline_replicas: CompactArray<i32>,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for DescribeTopicPartitionsPartition {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.error_code.encode(buf)?;
        self.partition_index.encode(buf)?;
        self.leader_id.encode(buf)?;
        self.leader_epoch.encode(buf)?;
        self.replica_nodes.encode(buf)?;
        self.isr_nodes.encode(buf)?;
        self.eligible_leader_replicas.encode(buf)?;
        self.last_known_elr.encode(buf)?;
        self.offline_replicas.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for DescribeTopicPartitionsPartition {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let error_code = ErrorCode::decode(buf)?;
        let partition_index = i32::decode(buf)?;
        let leader_id = i32::decode(buf)?;
        let leader_epoch = i32::decode(buf)?;
        let replica_nodes = CompactArray::<i32>::decode(buf)?;
        let isr_nodes = CompactArray::<i32>::decode(buf)?;
        let eligible_leader_replicas = CompactArray::<i32>::decode(buf)?;
        let last_known_elr = CompactArray::<i32>::decode(buf)?;
        let offline_replicas = CompactArray::<i32>::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            error_code,
            partition_index,
            leader_id,
            leader_epoch,
            replica_nodes,
            isr_nodes,
            eligible_leader_replicas,
            last_known_elr,
            offline_replicas,
            _tagged_fields,
        })
    }
}

/// Per-topic entry of a DescribeTopicPartitions response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeTopicPartitionsTopic {
    pub error_code: ErrorCode,
    pub name: CompactString,
    pub topic_id: Uuid,
    pub is_internal: KafkaBool,
    pub partitions: CompactArray<DescribeTopicPartitionsPartition>,
    pub topic_authorized_operations: i32,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for DescribeTopicPartitionsTopic {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.error_code.encode(buf)?;
        self.name.encode(buf)?;
        self.topic_id.encode(buf)?;
        self.is_internal.encode(buf)?;
        self.partitions.encode(buf)?;
        self.topic_authorized_operations.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for DescribeTopicPartitionsTopic {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let error_code = ErrorCode::decode(buf)?;
        let name = CompactString::decode(buf)?;
        let topic_id = Uuid::decode(buf)?;
        let is_internal = KafkaBool::decode(buf)?;
        let partitions = CompactArray::<DescribeTopicPartitionsPartition>::decode(buf)?;
        let topic_authorized_operations = i32::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            error_code,
            name,
            topic_id,
            is_internal,
            partitions,
            topic_authorized_operations,
            _tagged_fields,
        })
    }
}

/// DescribeTopicPartitions response (v0)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeTopicPartitionsResponse {
    pub throttle_time_ms: i32,
    pub topics: CompactArray<DescribeTopicPartitionsTopic>,
    pub next_cursor: NullableCursor,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for DescribeTopicPartitionsResponse {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.throttle_time_ms.encode(buf)?;
        self.topics.encode(buf)?;
        self.next_cursor.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for DescribeTopicPartitionsResponse {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let throttle_time_ms = i32::decode(buf)?;
        let topics = CompactArray::<DescribeTopicPartitionsTopic>::decode(buf)?;
        let next_cursor = NullableCursor::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            throttle_time_ms,
            topics,
            next_cursor,
            _tagged_fields,
        })
    }
}

// --- Fetch (key 1, v16) ---

/// One requested partition of a Fetch topic
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchPartition {
    pub partition: i32,
    pub current_leader_epoch: i32,
    pub fetch_offset: i64,
    pub last_fetched_epoch: i32,
    pub log_start_offset: i64,
    pub partition_max_bytes: i32,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for FetchPartition {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.partition.encode(buf)?;
        self.current_leader_epoch.encode(buf)?;
        self.fetch_offset.encode(buf)?;
        self.last_fetched_epoch.encode(buf)?;
        self.log_start_offset.encode(buf)?;
        self.partition_max_bytes.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for FetchPartition {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let partition = i32::decode(buf)?;
        let current_leader_epoch = i32::decode(buf)?;
        let fetch_offset = i64::decode(buf)?;
        let last_fetched_epoch = i32::decode(buf)?;
        let log_start_offset = i64::decode(buf)?;
        let partition_max_bytes = i32::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            partition,
            current_leader_epoch,
            fetch_offset,
            last_fetched_epoch,
            log_start_offset,
            partition_max_bytes,
            _tagged_fields,
        })
    }
}

/// One requested topic of a Fetch request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchTopic {
    pub topic_id: Uuid,
    pub partitions: CompactArray<FetchPartition>,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for FetchTopic {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.topic_id.encode(buf)?;
        self.partitions.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for FetchTopic {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let topic_id = Uuid::decode(buf)?;
        let partitions = CompactArray::<FetchPartition>::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            topic_id,
            partitions,
            _tagged_fields,
        })
    }
}

/// A topic the client is done fetching from (session bookkeeping)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForgottenTopic {
    pub topic_id: Uuid,
    pub partitions: CompactArray<i32>,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for ForgottenTopic {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.topic_id.encode(buf)?;
        self.partitions.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for ForgottenTopic {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let topic_id = Uuid::decode(buf)?;
        let partitions = CompactArray::<i32>::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            topic_id,
            partitions,
            _tagged_fields,
        })
    }
}

/// Fetch request (v16)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchRequest {
    pub max_wait_ms: i32,
    pub min_bytes: i32,
    pub max_bytes: i32,
    pub isolation_level: i8,
    pub session_id: i32,
    pub session_epoch: i32,
    pub topics: CompactArray<FetchTopic>,
    pub forgotten_topics_data: CompactArray<ForgottenTopic>,
    pub rack_id: CompactString,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for FetchRequest {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.max_wait_ms.encode(buf)?;
        self.min_bytes.encode(buf)?;
        self.max_bytes.encode(buf)?;
        self.isolation_level.encode(buf)?;
        self.session_id.encode(buf)?;
        self.session_epoch.encode(buf)?;
        self.topics.encode(buf)?;
        self.forgotten_topics_data.encode(buf)?;
        self.rack_id.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for FetchRequest {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let max_wait_ms = i32::decode(buf)?;
        let min_bytes = i32::decode(buf)?;
        let max_bytes = i32::decode(buf)?;
        let isolation_level = i8::decode(buf)?;
        let session_id = i32::decode(buf)?;
        let session_epoch = i32::decode(buf)?;
        let topics = CompactArray::<FetchTopic>::decode(buf)?;
        let forgotten_topics_data = CompactArray::<ForgottenTopic>::decode(buf)?;
        let rack_id = CompactString::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            max_wait_ms,
            min_bytes,
            max_bytes,
            isolation_level,
            session_id,
            session_epoch,
            topics,
            forgotten_topics_data,
            rack_id,
            _tagged_fields,
        })
    }
}

/// An aborted transaction range in a Fetch partition response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbortedTransaction {
    pub producer_id: i64,
    pub first_offset: i64,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for AbortedTransaction {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.producer_id.encode(buf)?;
        self.first_offset.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for AbortedTransaction {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let producer_id = i64::decode(buf)?;
        let first_offset = i64::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            producer_id,
            first_offset,
            _tagged_fields,
        })
    }
}

/// Per-partition entry of a Fetch response
///
/// `records` carries the raw on-disk record batches behind a compact-bytes
/// length; an empty partition is the single byte `0x01`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionData {
    pub partition_index: i32,
    pub error_code: ErrorCode,
    pub high_watermark: i64,
    pub last_stable_offset: i64,
    pub log_start_offset: i64,
    pub aborted_transactions: CompactArray<AbortedTransaction>,
    pub preferred_read_replica: i32,
    pub records: CompactBytes,
    pub _tagged_fields: TaggedFields,
}

impl Default for PartitionData {
    fn default() -> Self {
        Self {
            partition_index: 0,
            error_code: ErrorCode::None,
            high_watermark: 0,
            last_stable_offset: 0,
            log_start_offset: 0,
            aborted_transactions: CompactArray::default(),
            preferred_read_replica: -1,
            records: CompactBytes::empty(),
            _tagged_fields: TaggedFields,
        }
    }
}

impl Encodable for PartitionData {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.partition_index.encode(buf)?;
        self.error_code.encode(buf)?;
        self.high_watermark.encode(buf)?;
        self.last_stable_offset.encode(buf)?;
        self.log_start_offset.encode(buf)?;
        self.aborted_transactions.encode(buf)?;
        self.preferred_read_replica.encode(buf)?;
        self.records.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for PartitionData {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let partition_index = i32::decode(buf)?;
        let error_code = ErrorCode::decode(buf)?;
        let high_watermark = i64::decode(buf)?;
        let last_stable_offset = i64::decode(buf)?;
        let log_start_offset = i64::decode(buf)?;
        let aborted_transactions = CompactArray::<AbortedTransaction>::decode(buf)?;
        let preferred_read_replica = i32::decode(buf)?;
        let records = CompactBytes::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            partition_index,
            error_code,
            high_watermark,
            last_stable_offset,
            log_start_offset,
            aborted_transactions,
            preferred_read_replica,
            records,
            _tagged_fields,
        })
    }
}

/// Per-topic entry of a Fetch response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchableTopicResponse {
    pub topic_id: Uuid,
    pub partitions: CompactArray<PartitionData>,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for FetchableTopicResponse {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.topic_id.encode(buf)?;
        self.partitions.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for FetchableTopicResponse {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let topic_id = Uuid::decode(buf)?;
        let partitions = CompactArray::<PartitionData>::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            topic_id,
            partitions,
            _tagged_fields,
        })
    }
}

/// Fetch response (v16)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchResponse {
    pub throttle_time_ms: i32,
    pub error_code: ErrorCode,
    pub session_id: i32,
    pub responses: CompactArray<FetchableTopicResponse>,
    pub _tagged_fields: TaggedFields,
}

impl Encodable for FetchResponse {
    fn encode(&self, buf: &mut impl BufMut) -> Result<()> {
        self.throttle_time_ms.encode(buf)?;
        self.error_code.encode(buf)?;
        self.session_id.encode(buf)?;
        self.responses.encode(buf)?;
        self._tagged_fields.encode(buf)
    }
}

impl Decodable for FetchResponse {
    fn decode(buf: &mut impl Buf) -> Result<Self> {
        let throttle_time_ms = i32::decode(buf)?;
        let error_code = ErrorCode::decode(buf)?;
        let session_id = i32::decode(buf)?;
        let responses = CompactArray::<FetchableTopicResponse>::decode(buf)?;
        let _tagged_fields = TaggedFields::decode(buf)?;
        Ok(Self {
            throttle_time_ms,
            error_code,
            session_id,
            responses,
            _tagged_fields,
        })
    }
}
