//! Handler-facing facade over the metadata log and partition segments

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use bytes::Bytes;
use dashmap::DashMap;

use crate::index::MetadataIndex;
use crate::metadata::ClusterMetadata;
use crate::segment::{read_segment, LogDirs};

#[derive(Debug, Clone)]
struct CachedIndex {
    mtime: SystemTime,
    index: Arc<MetadataIndex>,
}

/// Serves metadata index snapshots and raw partition segment reads.
///
/// Snapshots are cached per segment path and rebuilt when the file's mtime
/// changes, so concurrent connections share one parse of an unchanged log.
#[derive(Debug, Default)]
pub struct MetadataManager {
    dirs: LogDirs,
    cache: DashMap<PathBuf, CachedIndex>,
}

impl MetadataManager {
    pub fn new(dirs: LogDirs) -> Self {
        Self {
            dirs,
            cache: DashMap::new(),
        }
    }

    /// The current metadata index snapshot.
    pub async fn index(&self) -> Result<Arc<MetadataIndex>> {
        let path = self.dirs.cluster_metadata_segment();

        let mtime = tokio::fs::metadata(&path)
            .await
            .and_then(|meta| meta.modified())
            .with_context(|| format!("cluster metadata log unavailable: {}", path.display()))?;

        if let Some(cached) = self.cache.get(&path) {
            if cached.mtime == mtime {
                return Ok(cached.index.clone());
            }
        }

        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read cluster metadata log: {}", path.display()))?;
        let meta = ClusterMetadata::decode(Bytes::from(data))?;
        let index = Arc::new(MetadataIndex::build(&meta)?);

        self.cache.insert(
            path,
            CachedIndex {
                mtime,
                index: index.clone(),
            },
        );
        Ok(index)
    }

    /// The raw bytes of one partition's segment; `None` when the file does
    /// not exist.
    pub async fn read_partition_segment(
        &self,
        topic: &str,
        partition: i32,
    ) -> io::Result<Option<Bytes>> {
        read_segment(&self.dirs.partition_segment(topic, partition)).await
    }
}
