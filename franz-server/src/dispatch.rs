//! Request framing and per-api dispatch
//!
//! A request is an INT32 length followed by exactly that many bytes. Each
//! frame is buffered whole, the header decoded, and the rest handed to the
//! matching handler; whatever the handler leaves unread is dropped with the
//! buffer, so framing never depends on handler consumption. Responses are
//! staged in a buffer and written behind their own INT32 length.

use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ServerError;
use franz_protocol::messages::*;
use franz_protocol::primitives::{CompactArray, CompactBytes, TaggedFields};
use franz_protocol::{ApiKey, Decodable, Encodable, ErrorCode};
use franz_storage::MetadataManager;

/// Largest request frame we will buffer.
const MAX_FRAME_SIZE: i64 = 8 * 1024 * 1024;

/// The (key, min, max) set advertised by ApiVersions, ascending by key.
const SUPPORTED_APIS: [(ApiKey, i16, i16); 3] = [
    (ApiKey::Fetch, 0, 16),
    (ApiKey::ApiVersions, 0, 4),
    (ApiKey::DescribeTopicPartitions, 0, 0),
];

pub(crate) enum ResponseBody {
    ApiVersions(ApiVersionsResponseV3),
    DescribeTopicPartitions(DescribeTopicPartitionsResponse),
    Fetch(FetchResponse),
}

impl ResponseBody {
    /// ApiVersions keeps the non-flexible v0 response header; a client has
    /// to parse it before it knows which versions the broker speaks.
    fn uses_flexible_header(&self) -> bool {
        !matches!(self, ResponseBody::ApiVersions(_))
    }
}

impl Encodable for ResponseBody {
    fn encode(&self, buf: &mut impl BufMut) -> anyhow::Result<()> {
        match self {
            ResponseBody::ApiVersions(res) => res.encode(buf),
            ResponseBody::DescribeTopicPartitions(res) => res.encode(buf),
            ResponseBody::Fetch(res) => res.encode(buf),
        }
    }
}

/// Serve one request frame. `Ok(false)` means the peer closed cleanly.
pub(crate) async fn dispatch(
    stream: &mut TcpStream,
    metadata: &Arc<MetadataManager>,
) -> Result<bool, ServerError> {
    let mut len_buf = [0u8; 4];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(false),
        Err(err) => return Err(err.into()),
    }
    let len = i32::from_be_bytes(len_buf) as i64;
    if !(0..=MAX_FRAME_SIZE).contains(&len) {
        return Err(ServerError::InvalidFrameLength(len));
    }

    let mut request_buf = BytesMut::with_capacity(len as usize);
    request_buf.resize(len as usize, 0);
    stream.read_exact(&mut request_buf).await?;

    let header = RequestHeader::decode(&mut request_buf)?;
    info!(
        api_key = ?header.api_key,
        api_version = header.api_version,
        correlation_id = header.correlation_id,
        client_id = header.client_id.0.as_deref(),
        length = len,
        "received request"
    );

    let response_body = match header.api_key {
        ApiKey::ApiVersions => handle_api_versions(&header, &mut request_buf)?,
        ApiKey::DescribeTopicPartitions => {
            handle_describe_topic_partitions(&mut request_buf, metadata).await?
        }
        ApiKey::Fetch => handle_fetch(&mut request_buf, metadata).await?,
    };

    let response = encode_response(&header, &response_body)?;
    stream.write_all(&response).await?;
    Ok(true)
}

fn handle_api_versions(
    header: &RequestHeader,
    request_buf: &mut BytesMut,
) -> Result<ResponseBody, ServerError> {
    if !(0..=4).contains(&header.api_version) {
        warn!(
            api_version = header.api_version,
            "unsupported ApiVersions version"
        );
        return Ok(ResponseBody::ApiVersions(ApiVersionsResponseV3 {
            error_code: ErrorCode::UnsupportedVersion,
            api_keys: CompactArray::default(),
            throttle_time_ms: 0,
            _tagged_fields: TaggedFields,
        }));
    }

    // The request body only exists from v3 on; v0-v2 requests are empty.
    if header.api_version >= 3 {
        let request = ApiVersionsRequest::decode(request_buf)?;
        debug!(
            client_software_name = request.client_software_name.as_str(),
            client_software_version = request.client_software_version.as_str(),
            "ApiVersions request"
        );
    }

    let api_keys: Vec<ApiVersion> = SUPPORTED_APIS
        .iter()
        .map(|&(api_key, min_version, max_version)| ApiVersion {
            api_key,
            min_version,
            max_version,
            _tagged_fields: TaggedFields,
        })
        .collect();

    Ok(ResponseBody::ApiVersions(ApiVersionsResponseV3 {
        error_code: ErrorCode::None,
        api_keys: api_keys.into(),
        throttle_time_ms: 0,
        _tagged_fields: TaggedFields,
    }))
}

async fn handle_describe_topic_partitions(
    request_buf: &mut BytesMut,
    metadata: &Arc<MetadataManager>,
) -> Result<ResponseBody, ServerError> {
    let request = DescribeTopicPartitionsRequest::decode(request_buf)?;
    let index = metadata.index().await?;

    let mut topics = Vec::with_capacity(request.topics.as_slice().len());
    for topic in request.topics.as_slice() {
        let name = topic.name.as_str().unwrap_or_default();
        let entry = match index.topic_by_name(name) {
            None => {
                debug!(topic = name, "unknown topic");
                DescribeTopicPartitionsTopic {
                    error_code: ErrorCode::UnknownTopicOrPartition,
                    name: topic.name.clone(),
                    topic_id: Uuid::nil(),
                    is_internal: false.into(),
                    partitions: CompactArray::default(),
                    topic_authorized_operations: 0,
                    _tagged_fields: TaggedFields,
                }
            }
            Some(record) => {
                let partitions: Vec<DescribeTopicPartitionsPartition> = index
                    .partitions(&record.topic_id)
                    .iter()
                    .map(|partition| DescribeTopicPartitionsPartition {
                        error_code: ErrorCode::None,
                        partition_index: partition.partition_id,
                        leader_id: partition.leader,
                        leader_epoch: partition.leader_epoch,
                        replica_nodes: partition.replicas.clone().into(),
                        isr_nodes: partition.isr.clone().into(),
                        eligible_leader_replicas: CompactArray::default(),
                        last_known_elr: CompactArray::default(),
                        offline_replicas: CompactArray::default(),
                        _tagged_fields: TaggedFields,
                    })
                    .collect();

                DescribeTopicPartitionsTopic {
                    error_code: ErrorCode::None,
                    name: topic.name.clone(),
                    topic_id: record.topic_id,
                    is_internal: false.into(),
                    partitions: partitions.into(),
                    topic_authorized_operations: 0,
                    _tagged_fields: TaggedFields,
                }
            }
        };
        topics.push(entry);
    }

    Ok(ResponseBody::DescribeTopicPartitions(
        DescribeTopicPartitionsResponse {
            throttle_time_ms: 0,
            topics: topics.into(),
            next_cursor: NullableCursor(None),
            _tagged_fields: TaggedFields,
        },
    ))
}

async fn handle_fetch(
    request_buf: &mut BytesMut,
    metadata: &Arc<MetadataManager>,
) -> Result<ResponseBody, ServerError> {
    let request = FetchRequest::decode(request_buf)?;
    let index = metadata.index().await?;

    let mut responses = Vec::with_capacity(request.topics.as_slice().len());
    for topic in request.topics.as_slice() {
        let record = index.topic_by_id(&topic.topic_id);
        if record.is_none() {
            debug!(topic_id = %topic.topic_id, "unknown topic id");
        }

        let mut partitions = Vec::with_capacity(topic.partitions.as_slice().len());
        for requested in topic.partitions.as_slice() {
            let partition = match record {
                None => PartitionData {
                    partition_index: requested.partition,
                    error_code: ErrorCode::UnknownTopicId,
                    ..PartitionData::default()
                },
                Some(record) => {
                    let segment = metadata
                        .read_partition_segment(&record.name, requested.partition)
                        .await?;
                    let records = match segment {
                        Some(bytes) if !bytes.is_empty() => CompactBytes::from(bytes),
                        _ => CompactBytes::empty(),
                    };
                    PartitionData {
                        partition_index: requested.partition,
                        records,
                        ..PartitionData::default()
                    }
                }
            };
            partitions.push(partition);
        }

        responses.push(FetchableTopicResponse {
            topic_id: topic.topic_id,
            partitions: partitions.into(),
            _tagged_fields: TaggedFields,
        });
    }

    Ok(ResponseBody::Fetch(FetchResponse {
        throttle_time_ms: 0,
        error_code: ErrorCode::None,
        session_id: 0,
        responses: responses.into(),
        _tagged_fields: TaggedFields,
    }))
}

fn encode_response(header: &RequestHeader, body: &ResponseBody) -> anyhow::Result<BytesMut> {
    let mut buf = BytesMut::new();

    if body.uses_flexible_header() {
        ResponseHeaderFlexible {
            correlation_id: header.correlation_id,
            _tagged_fields: TaggedFields,
        }
        .encode(&mut buf)?;
    } else {
        ResponseHeader {
            correlation_id: header.correlation_id,
        }
        .encode(&mut buf)?;
    }
    body.encode(&mut buf)?;

    let mut framed = BytesMut::with_capacity(buf.len() + 4);
    (buf.len() as i32).encode(&mut framed)?;
    framed.put(buf);

    Ok(framed)
}
