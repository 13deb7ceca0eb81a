//! In-memory lookups over the decoded cluster metadata

use std::collections::HashMap;

use anyhow::Result;
use uuid::Uuid;

use crate::metadata::ClusterMetadata;
use crate::record::{MetadataRecord, PartitionRecord, TopicRecord};
use franz_protocol::DecodeError;

/// A read-only snapshot of the cluster's topics and partitions.
///
/// Partition lists preserve on-disk record order. Records with a present key,
/// a null value, or a type we do not consume are skipped.
#[derive(Debug, Default)]
pub struct MetadataIndex {
    topics_by_name: HashMap<String, TopicRecord>,
    topics_by_id: HashMap<Uuid, TopicRecord>,
    partitions_by_topic: HashMap<Uuid, Vec<PartitionRecord>>,
    feature_levels: HashMap<String, i16>,
}

impl MetadataIndex {
    pub fn build(meta: &ClusterMetadata) -> Result<Self> {
        let mut index = MetadataIndex::default();

        for record in meta.records() {
            if record.key.is_some() {
                continue;
            }
            let Some(value) = &record.value else {
                continue;
            };
            let decoded = match MetadataRecord::decode(value) {
                Ok(decoded) => decoded,
                Err(err) => match err.downcast_ref::<DecodeError>() {
                    Some(DecodeError::UnknownRecordType(record_type)) => {
                        tracing::debug!(record_type = *record_type, "skipping metadata record");
                        continue;
                    }
                    _ => return Err(err),
                },
            };

            match decoded {
                MetadataRecord::Topic(topic) => {
                    index
                        .topics_by_name
                        .insert(topic.name.clone(), topic.clone());
                    index.topics_by_id.insert(topic.topic_id, topic);
                }
                MetadataRecord::Partition(partition) => {
                    index
                        .partitions_by_topic
                        .entry(partition.topic_id)
                        .or_default()
                        .push(partition);
                }
                MetadataRecord::FeatureLevel(feature) => {
                    index
                        .feature_levels
                        .insert(feature.name, feature.feature_level);
                }
            }
        }

        Ok(index)
    }

    pub fn topic_by_name(&self, name: &str) -> Option<&TopicRecord> {
        self.topics_by_name.get(name)
    }

    pub fn topic_by_id(&self, topic_id: &Uuid) -> Option<&TopicRecord> {
        self.topics_by_id.get(topic_id)
    }

    pub fn partitions(&self, topic_id: &Uuid) -> &[PartitionRecord] {
        self.partitions_by_topic
            .get(topic_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn feature_level(&self, name: &str) -> Option<i16> {
        self.feature_levels.get(name).copied()
    }
}
