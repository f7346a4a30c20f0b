use crate::domain::podcast::PodcastError;
use async_trait::async_trait;

/// Storage for audio files, addressed by key
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `key`, replacing any previous content.
    /// Returns the public location clients can fetch the audio from.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, PodcastError>;

    /// Remove `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), PodcastError>;
}

pub(crate) fn public_location(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}
