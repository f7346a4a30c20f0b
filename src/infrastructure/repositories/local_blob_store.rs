use super::blob_store::{public_location, BlobStore};
use crate::domain::podcast::PodcastError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Blob store backed by a local directory; files are served under the public base URL
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PodcastError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PodcastError::Persistence(format!("invalid blob key: {}", key)));
        }
        Ok(self.root.join(key))
    }
}

fn io_error(action: &str, key: &str, err: std::io::Error) -> PodcastError {
    tracing::error!(error = %err, key = key, "Failed to {} audio blob", action);
    PodcastError::Persistence(format!("failed to {} {}: {}", action, key, err))
}

/// Write then rename so readers never see a partial file
async fn write_staged(staging: &Path, path: &Path, key: &str, bytes: &[u8]) -> Result<(), PodcastError> {
    tokio::fs::write(staging, bytes)
        .await
        .map_err(|e| io_error("write", key, e))?;
    tokio::fs::rename(staging, path)
        .await
        .map_err(|e| io_error("store", key, e))
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, PodcastError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error("prepare", key, e))?;

        // One staging file per call; concurrent puts of a key never share it
        let staging = self.root.join(format!(".{}.{}.part", key, Uuid::new_v4().simple()));
        if let Err(e) = write_staged(&staging, &path, key, &bytes).await {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(error = %cleanup, key = key, "Failed to remove staging file");
                }
            }
            return Err(e);
        }

        tracing::info!(
            key = key,
            content_type = content_type,
            size_bytes = bytes.len(),
            "Audio blob stored"
        );

        Ok(public_location(&self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<(), PodcastError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete", key, e)),
        }
    }
}
