//! In-process record and blob stores.
//!
//! Used when no `DATABASE_URL` is configured and as the storage layer in tests.

use super::blob_store::{public_location, BlobStore};
use super::podcast_repository::PodcastRepository;
use crate::domain::podcast::{PodcastError, PodcastRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records kept in insertion order
#[derive(Default)]
pub struct InMemoryPodcastRepository {
    records: RwLock<Vec<PodcastRecord>>,
}

impl InMemoryPodcastRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, id: Uuid, apply: F) -> Result<(), PodcastError>
    where
        F: FnOnce(&mut PodcastRecord) + Send,
    {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PodcastError::NotFound(id.to_string()))?;
        apply(record);
        record.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl PodcastRepository for InMemoryPodcastRepository {
    async fn create(&self, topic: &str, script: &str) -> Result<PodcastRecord, PodcastError> {
        let now = Utc::now();
        let record = PodcastRecord {
            id: Uuid::new_v4(),
            topic: topic.to_string(),
            script: script.to_string(),
            summary: None,
            audio_location: None,
            created_at: now,
            updated_at: now,
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_summary(&self, id: Uuid, summary: &str) -> Result<(), PodcastError> {
        let summary = summary.to_string();
        self.modify(id, move |r| r.summary = Some(summary)).await
    }

    async fn update_audio_location(&self, id: Uuid, location: &str) -> Result<(), PodcastError> {
        let location = location.to_string();
        self.modify(id, move |r| r.audio_location = Some(location)).await
    }

    async fn list(&self, limit: i64) -> Result<Vec<PodcastRecord>, PodcastError> {
        let records = self.records.read().await;
        // Newest insertion first, so equal timestamps still list most recent first
        let mut listed: Vec<PodcastRecord> = records.iter().rev().cloned().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed.truncate(usize::try_from(limit.max(0)).unwrap_or(0));
        Ok(listed)
    }

    async fn get(&self, id: Uuid) -> Result<PodcastRecord, PodcastError> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| PodcastError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), PodcastError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(PodcastError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn check_connection(&self) -> Result<(), PodcastError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct InMemoryBlobStore {
    public_base_url: String,
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.read().await.get(key).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, PodcastError> {
        self.blobs.write().await.insert(
            key.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(public_location(&self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), PodcastError> {
        self.blobs.write().await.remove(key);
        Ok(())
    }
}
