use super::error::{PodcastError, StageFailure};
use super::model::{audio_key, PodcastRecord, Topic};
use super::pipeline::{GenerationContext, GenerationOutcome, PipelineState, PodcastPipeline};
use crate::infrastructure::repositories::{BlobStore, PodcastRepository};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

/// A generation running in the background
pub struct GenerationHandle {
    pub progress: mpsc::UnboundedReceiver<PipelineState>,
    pub cancel: CancellationToken,
    pub task: JoinHandle<Result<GenerationOutcome, StageFailure>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    pub database: bool,
    pub providers_configured: bool,
}

pub struct PodcastService {
    pipeline: Arc<PodcastPipeline>,
    records: Arc<dyn PodcastRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl PodcastService {
    pub fn new(
        pipeline: Arc<PodcastPipeline>,
        records: Arc<dyn PodcastRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            pipeline,
            records,
            blobs,
        }
    }
}

#[async_trait]
pub trait PodcastServiceApi: Send + Sync {
    /// Run the pipeline to a terminal state.
    ///
    /// Errors mean no record exists; audio failures come back inside the outcome.
    async fn generate(&self, topic: &str) -> Result<GenerationOutcome, StageFailure>;

    /// Validate the topic, then run the pipeline on a background task.
    /// Cancelling the returned token stops the run at its next suspension point.
    fn start_generation(&self, topic: &str) -> Result<GenerationHandle, PodcastError>;

    /// Re-run audio production for a record that has none
    async fn resume_audio(&self, id: Uuid) -> Result<GenerationOutcome, PodcastError>;

    /// Most recent first; `limit` defaults to 20 and is clamped to 1..=100
    async fn list(&self, limit: Option<i64>) -> Result<Vec<PodcastRecord>, PodcastError>;

    async fn get(&self, id: Uuid) -> Result<PodcastRecord, PodcastError>;

    /// Deletes the audio blob best-effort, then the record
    async fn delete(&self, id: Uuid) -> Result<(), PodcastError>;

    async fn readiness(&self) -> Readiness;
}

#[async_trait]
impl PodcastServiceApi for PodcastService {
    async fn generate(&self, topic: &str) -> Result<GenerationOutcome, StageFailure> {
        tracing::info!(topic_length = topic.len(), "Podcast generation request");

        let (ctx, _progress) = GenerationContext::new();
        self.pipeline.generate(topic, &ctx).await
    }

    fn start_generation(&self, topic: &str) -> Result<GenerationHandle, PodcastError> {
        let topic = Topic::parse(topic)?;
        tracing::info!(topic = %topic, "Streaming podcast generation request");

        let (ctx, progress) = GenerationContext::new();
        let cancel = ctx.cancellation_token();
        let pipeline = self.pipeline.clone();
        let task = tokio::spawn(async move { pipeline.generate_topic(topic, &ctx).await });

        Ok(GenerationHandle {
            progress,
            cancel,
            task,
        })
    }

    async fn resume_audio(&self, id: Uuid) -> Result<GenerationOutcome, PodcastError> {
        let record = self.records.get(id).await?;
        tracing::info!(podcast_id = %id, "Resuming audio generation");

        let (ctx, _progress) = GenerationContext::new();
        Ok(self.pipeline.resume(record, &ctx).await)
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<PodcastRecord>, PodcastError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.records.list(limit).await
    }

    async fn get(&self, id: Uuid) -> Result<PodcastRecord, PodcastError> {
        self.records.get(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), PodcastError> {
        let record = self.records.get(id).await?;

        if let Err(e) = self.blobs.delete(&audio_key(record.id)).await {
            tracing::warn!(podcast_id = %id, error = %e, "Failed to delete audio blob, deleting record anyway");
        }

        self.records.delete(id).await?;
        tracing::info!(podcast_id = %id, "Podcast deleted");
        Ok(())
    }

    async fn readiness(&self) -> Readiness {
        let database = match self.records.check_connection().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Record store not reachable");
                false
            }
        };

        Readiness {
            database,
            providers_configured: self.pipeline.check_configured().is_ok(),
        }
    }
}
