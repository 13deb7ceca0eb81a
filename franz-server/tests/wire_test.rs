use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use bytes::{Buf, Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use uuid::Uuid;

use franz_protocol::messages::{
    ApiVersionsRequest, DescribeTopicPartitionsRequest, DescribeTopicPartitionsResponse,
    FetchPartition, FetchRequest, FetchResponse, FetchTopic, NullableCursor, RequestHeader,
    TopicRequest,
};
use franz_protocol::primitives::{CompactArray, NullableString, TaggedFields};
use franz_protocol::{ApiKey, Decodable, Encodable, ErrorCode};
use franz_server::Server;
use franz_storage::{LogDirs, MetadataManager};

const CLUSTER_METADATA_LOG: &[u8] =
    include_bytes!("../../franz-storage/tests/data/cluster_metadata.log");

fn saz_topic_id() -> Uuid {
    Uuid::from_bytes([0, 0, 0, 0, 0, 0, 0x40, 0, 0x80, 0, 0, 0, 0, 0, 0, 0x91])
}

fn seed_metadata(root: &Path) {
    let path = LogDirs::new(root).cluster_metadata_segment();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, CLUSTER_METADATA_LOG).unwrap();
}

async fn start_server(
    root: &Path,
) -> Result<(
    SocketAddr,
    broadcast::Sender<()>,
    tokio::task::JoinHandle<()>,
)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let metadata = Arc::new(MetadataManager::new(LogDirs::new(root)));
    let (server, shutdown_tx) = Server::new(listener, 100, metadata);

    let handle = tokio::spawn(async move {
        if let Err(err) = server.run().await {
            eprintln!("server error: {}", err);
        }
    });

    Ok((addr, shutdown_tx, handle))
}

fn finish_frame(payload: BytesMut) -> Vec<u8> {
    let mut framed = Vec::with_capacity(payload.len() + 4);
    framed.extend_from_slice(&(payload.len() as i32).to_be_bytes());
    framed.extend_from_slice(&payload);
    framed
}

fn api_versions_frame(correlation_id: i32, api_version: i16) -> Vec<u8> {
    let header = RequestHeader {
        api_key: ApiKey::ApiVersions,
        api_version,
        correlation_id,
        client_id: "kafka-cli".into(),
        _tagged_fields: TaggedFields,
    };
    let mut payload = BytesMut::new();
    header.encode(&mut payload).unwrap();
    if (3..=4).contains(&api_version) {
        ApiVersionsRequest {
            client_software_name: "c".into(),
            client_software_version: "1".into(),
            _tagged_fields: TaggedFields,
        }
        .encode(&mut payload)
        .unwrap();
    }
    finish_frame(payload)
}

fn describe_topic_partitions_frame(correlation_id: i32, topic: &str) -> Vec<u8> {
    let header = RequestHeader {
        api_key: ApiKey::DescribeTopicPartitions,
        api_version: 0,
        correlation_id,
        client_id: NullableString(None),
        _tagged_fields: TaggedFields,
    };
    let request = DescribeTopicPartitionsRequest {
        topics: CompactArray::from(vec![TopicRequest {
            name: topic.into(),
            _tagged_fields: TaggedFields,
        }]),
        response_partition_limit: 100,
        cursor: NullableCursor(None),
        _tagged_fields: TaggedFields,
    };
    let mut payload = BytesMut::new();
    header.encode(&mut payload).unwrap();
    request.encode(&mut payload).unwrap();
    finish_frame(payload)
}

fn fetch_frame(correlation_id: i32, topic_id: Uuid, partition: i32) -> Vec<u8> {
    let header = RequestHeader {
        api_key: ApiKey::Fetch,
        api_version: 16,
        correlation_id,
        client_id: NullableString(None),
        _tagged_fields: TaggedFields,
    };
    let request = FetchRequest {
        max_wait_ms: 500,
        min_bytes: 1,
        max_bytes: 52428800,
        isolation_level: 0,
        session_id: 0,
        session_epoch: 0,
        topics: CompactArray::from(vec![FetchTopic {
            topic_id,
            partitions: CompactArray::from(vec![FetchPartition {
                partition,
                current_leader_epoch: -1,
                fetch_offset: 0,
                last_fetched_epoch: -1,
                log_start_offset: -1,
                partition_max_bytes: 1048576,
                _tagged_fields: TaggedFields,
            }]),
            _tagged_fields: TaggedFields,
        }]),
        forgotten_topics_data: CompactArray::default(),
        rack_id: "".into(),
        _tagged_fields: TaggedFields,
    };
    let mut payload = BytesMut::new();
    header.encode(&mut payload).unwrap();
    request.encode(&mut payload).unwrap();
    finish_frame(payload)
}

async fn read_frame(stream: &mut TcpStream) -> Bytes {
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf).await.unwrap();
    let len = i32::from_be_bytes(len_buf) as usize;
    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await.unwrap();
    Bytes::from(body)
}

/// Read the flexible (v1) response header and hand back the body cursor.
fn strip_flexible_header(frame: Bytes, correlation_id: i32) -> Bytes {
    let mut buf = frame;
    assert_eq!(i32::decode(&mut buf).unwrap(), correlation_id);
    assert_eq!(buf.get_u8(), 0, "header tagged fields");
    buf
}

#[tokio::test]
async fn api_versions_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());
    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;

    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(&api_versions_frame(7, 4)).await?;

    let response = read_frame(&mut stream).await;
    let expected: &[u8] = &[
        0, 0, 0, 7, // correlation id, v0 header: no tagged byte
        0, 0, // error code
        4, // three api keys
        0, 1, 0, 0, 0, 16, 0, // Fetch
        0, 18, 0, 0, 0, 4, 0, // ApiVersions
        0, 75, 0, 0, 0, 0, 0, // DescribeTopicPartitions
        0, 0, 0, 0, // throttle time
        0, // tagged fields
    ];
    assert_eq!(&response[..], expected);

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}

#[tokio::test]
async fn api_versions_unsupported_version_keeps_connection_open() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());
    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;

    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(&api_versions_frame(11, 99)).await?;

    let response = read_frame(&mut stream).await;
    assert_eq!(
        &response[..],
        &[0, 0, 0, 11, 0, 35, 1, 0, 0, 0, 0, 0],
        "error 35 with an empty api key array"
    );

    // The connection survives an unsupported version.
    stream.write_all(&api_versions_frame(12, 4)).await?;
    let response = read_frame(&mut stream).await;
    assert_eq!(&response[..4], &[0, 0, 0, 12]);

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}

#[tokio::test]
async fn pipelined_requests_answer_in_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());
    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;

    let mut stream = TcpStream::connect(addr).await?;
    let mut batch = Vec::new();
    for correlation_id in 1..=3 {
        batch.extend_from_slice(&api_versions_frame(correlation_id, 4));
    }
    stream.write_all(&batch).await?;

    for correlation_id in 1..=3i32 {
        let response = read_frame(&mut stream).await;
        assert_eq!(&response[..4], &correlation_id.to_be_bytes());
    }

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}

#[tokio::test]
async fn describe_topic_partitions_unknown_topic() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());
    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;

    let mut stream = TcpStream::connect(addr).await?;
    stream
        .write_all(&describe_topic_partitions_frame(21, "foo"))
        .await?;

    let mut body = strip_flexible_header(read_frame(&mut stream).await, 21);
    let response = DescribeTopicPartitionsResponse::decode(&mut body)?;
    assert_eq!(body.len(), 0);

    let topics = response.topics.as_slice();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].error_code, ErrorCode::UnknownTopicOrPartition);
    assert_eq!(topics[0].name.as_str(), Some("foo"));
    assert_eq!(topics[0].topic_id, Uuid::nil());
    assert!(topics[0].partitions.as_slice().is_empty());
    assert_eq!(topics[0].topic_authorized_operations, 0);
    assert_eq!(response.next_cursor.0, None);

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}

#[tokio::test]
async fn describe_topic_partitions_known_topic() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());
    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;

    let mut stream = TcpStream::connect(addr).await?;
    stream
        .write_all(&describe_topic_partitions_frame(22, "saz"))
        .await?;

    let mut body = strip_flexible_header(read_frame(&mut stream).await, 22);
    let response = DescribeTopicPartitionsResponse::decode(&mut body)?;

    let topics = response.topics.as_slice();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].error_code, ErrorCode::None);
    assert_eq!(topics[0].topic_id, saz_topic_id());

    let partitions = topics[0].partitions.as_slice();
    assert_eq!(partitions.len(), 2);
    for (i, partition) in partitions.iter().enumerate() {
        assert_eq!(partition.error_code, ErrorCode::None);
        assert_eq!(partition.partition_index, i as i32);
        assert_eq!(partition.leader_id, 1);
        assert_eq!(partition.leader_epoch, 0);
        assert_eq!(partition.replica_nodes.as_slice(), &[1]);
        assert_eq!(partition.isr_nodes.as_slice(), &[1]);
        assert!(partition.eligible_leader_replicas.as_slice().is_empty());
        assert!(partition.last_known_elr.as_slice().is_empty());
        assert!(partition.offline_replicas.as_slice().is_empty());
    }

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}

#[tokio::test]
async fn fetch_unknown_topic_id() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());
    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;

    let mut stream = TcpStream::connect(addr).await?;
    stream
        .write_all(&fetch_frame(31, Uuid::from_bytes([9; 16]), 0))
        .await?;

    let mut body = strip_flexible_header(read_frame(&mut stream).await, 31);
    let response = FetchResponse::decode(&mut body)?;
    assert_eq!(body.len(), 0);
    assert_eq!(response.error_code, ErrorCode::None);

    let topics = response.responses.as_slice();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].topic_id, Uuid::from_bytes([9; 16]));

    let partitions = topics[0].partitions.as_slice();
    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].partition_index, 0);
    assert_eq!(partitions[0].error_code, ErrorCode::UnknownTopicId);
    assert_eq!(partitions[0].high_watermark, 0);
    assert_eq!(partitions[0].last_stable_offset, 0);
    assert_eq!(partitions[0].log_start_offset, 0);
    assert!(partitions[0].aborted_transactions.as_slice().is_empty());
    assert_eq!(partitions[0].preferred_read_replica, -1);
    assert_eq!(partitions[0].records.0.as_deref(), Some(&[][..]));

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}

#[tokio::test]
async fn fetch_known_topic_embeds_raw_segment_bytes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());

    // The first batch of the metadata fixture doubles as a valid topic
    // segment; the handler embeds it without reparsing.
    let segment = &CLUSTER_METADATA_LOG[..91];
    let path = LogDirs::new(dir.path()).partition_segment("saz", 0);
    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(&path, segment)?;

    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(&fetch_frame(32, saz_topic_id(), 0)).await?;

    let mut body = strip_flexible_header(read_frame(&mut stream).await, 32);
    let response = FetchResponse::decode(&mut body)?;

    let partitions = response.responses.as_slice()[0].partitions.as_slice();
    assert_eq!(partitions[0].error_code, ErrorCode::None);
    assert_eq!(partitions[0].records.0.as_deref(), Some(segment));

    // A partition with no segment on disk reads as present-but-empty.
    stream.write_all(&fetch_frame(33, saz_topic_id(), 1)).await?;
    let mut body = strip_flexible_header(read_frame(&mut stream).await, 33);
    let response = FetchResponse::decode(&mut body)?;
    let partitions = response.responses.as_slice()[0].partitions.as_slice();
    assert_eq!(partitions[0].error_code, ErrorCode::None);
    assert_eq!(partitions[0].records.0.as_deref(), Some(&[][..]));

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}

#[tokio::test]
async fn unknown_api_key_closes_the_connection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    seed_metadata(dir.path());
    let (addr, shutdown_tx, handle) = start_server(dir.path()).await?;

    let mut stream = TcpStream::connect(addr).await?;
    // Metadata (key 3) is not served: header decode fails and the server
    // hangs up without a response.
    let payload: &[u8] = &[0, 3, 0, 9, 0, 0, 0, 41, 0xff, 0xff, 0];
    let mut frame = (payload.len() as i32).to_be_bytes().to_vec();
    frame.extend_from_slice(payload);
    stream.write_all(&frame).await?;

    let mut buf = [0u8; 1];
    let read = stream.read(&mut buf).await?;
    assert_eq!(read, 0, "expected EOF");

    shutdown_tx.send(())?;
    handle.await?;
    Ok(())
}
