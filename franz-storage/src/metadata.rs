//! Decoding of the cluster metadata log
//!
//! The `__cluster_metadata-0` segment is a concatenation of record batches.
//! Running out of input between batches is a clean end of log; running out
//! inside a batch means the log is corrupt.

use anyhow::{Context, Result};
use bytes::{Buf, Bytes};

use franz_protocol::batch::{Record, RecordBatch};
use franz_protocol::Decodable;

/// The decoded batches of one metadata log segment, in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMetadata {
    pub batches: Vec<RecordBatch>,
}

impl ClusterMetadata {
    pub fn decode(data: Bytes) -> Result<Self> {
        let mut buf = data;
        let mut batches = Vec::new();
        while buf.has_remaining() {
            let batch = RecordBatch::decode(&mut buf)
                .with_context(|| format!("corrupt metadata log at batch {}", batches.len()))?;
            batches.push(batch);
        }
        Ok(Self { batches })
    }

    /// All records of all batches, in on-disk order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.batches.iter().flat_map(|batch| batch.records.iter())
    }
}
