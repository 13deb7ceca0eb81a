//! Mapping of (topic, partition) to on-disk segment files
//!
//! A KRaft combined-log directory holds one directory per partition, each
//! containing a single active segment named by its twenty-digit base offset.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;

/// Default root written by a KRaft-mode broker.
pub const DEFAULT_LOG_ROOT: &str = "/tmp/kraft-combined-logs";

/// The cluster metadata partition directory.
const CLUSTER_METADATA_DIR: &str = "__cluster_metadata-0";

/// The single segment this broker reads per partition.
const SEGMENT_FILE: &str = "00000000000000000000.log";

/// Resolves partition directories under one log root.
#[derive(Debug, Clone)]
pub struct LogDirs {
    root: PathBuf,
}

impl Default for LogDirs {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_ROOT)
    }
}

impl LogDirs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn cluster_metadata_segment(&self) -> PathBuf {
        self.root.join(CLUSTER_METADATA_DIR).join(SEGMENT_FILE)
    }

    pub fn partition_segment(&self, topic: &str, partition: i32) -> PathBuf {
        self.root
            .join(format!("{}-{}", topic, partition))
            .join(SEGMENT_FILE)
    }
}

/// Read a whole segment file; a missing file is `Ok(None)`.
pub async fn read_segment(path: &Path) -> io::Result<Option<Bytes>> {
    match tokio::fs::read(path).await {
        Ok(data) => Ok(Some(Bytes::from(data))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_segment_paths() {
        let dirs = LogDirs::new("/var/lib/franz");
        assert_eq!(
            dirs.cluster_metadata_segment(),
            PathBuf::from("/var/lib/franz/__cluster_metadata-0/00000000000000000000.log")
        );
        assert_eq!(
            dirs.partition_segment("saz", 1),
            PathBuf::from("/var/lib/franz/saz-1/00000000000000000000.log")
        );
    }

    #[tokio::test]
    async fn missing_segment_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = LogDirs::new(dir.path());
        let data = read_segment(&dirs.partition_segment("ghost", 0))
            .await
            .unwrap();
        assert_eq!(data, None);
    }

    #[tokio::test]
    async fn segment_reads_raw_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = LogDirs::new(dir.path());
        let path = dirs.partition_segment("saz", 0);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"raw batch bytes").unwrap();

        let data = read_segment(&path).await.unwrap().unwrap();
        assert_eq!(&data[..], b"raw batch bytes");
    }
}
