//! KRaft metadata log decoding and partition segment access for franz.

pub mod index;
pub mod manager;
pub mod metadata;
pub mod record;
pub mod segment;

pub use index::MetadataIndex;
pub use manager::MetadataManager;
pub use metadata::ClusterMetadata;
pub use record::{
    BaseRecord, FeatureLevelRecord, MetadataRecord, PartitionRecord, TopicRecord,
};
pub use segment::{LogDirs, DEFAULT_LOG_ROOT};
