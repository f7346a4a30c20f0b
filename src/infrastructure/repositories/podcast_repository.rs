use crate::domain::podcast::{PodcastError, PodcastRecord};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence for podcast records.
///
/// Every failure is `Persistence` except lookups and updates of an unknown id,
/// which report `NotFound`.
#[async_trait]
pub trait PodcastRepository: Send + Sync {
    /// Insert a new record with no summary and no audio; the store assigns the id
    async fn create(&self, topic: &str, script: &str) -> Result<PodcastRecord, PodcastError>;

    async fn update_summary(&self, id: Uuid, summary: &str) -> Result<(), PodcastError>;

    async fn update_audio_location(&self, id: Uuid, location: &str) -> Result<(), PodcastError>;

    /// Most recently created first
    async fn list(&self, limit: i64) -> Result<Vec<PodcastRecord>, PodcastError>;

    async fn get(&self, id: Uuid) -> Result<PodcastRecord, PodcastError>;

    async fn delete(&self, id: Uuid) -> Result<(), PodcastError>;

    async fn check_connection(&self) -> Result<(), PodcastError>;
}
