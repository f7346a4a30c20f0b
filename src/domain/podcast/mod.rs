pub mod error;
pub mod model;
pub mod pipeline;
pub mod service;

pub use error::{ErrorKind, FailureReason, PodcastError, Stage, StageFailure};
pub use model::{audio_key, PodcastRecord, Topic};
pub use pipeline::{GenerationContext, GenerationOutcome, PipelineState, PodcastPipeline, VoiceMap};
pub use service::{GenerationHandle, PodcastService, PodcastServiceApi, Readiness};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for POST /api/podcasts
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePodcastRequest {
    #[serde(default)]
    pub topic: String,
}

/// Query for GET /api/podcasts
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListPodcastsQuery {
    pub limit: Option<i64>,
}

/// Response for podcast endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastResponse {
    pub id: Uuid,
    pub topic: String,
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PodcastRecord> for PodcastResponse {
    fn from(record: PodcastRecord) -> Self {
        Self {
            id: record.id,
            topic: record.topic,
            script: record.script,
            summary: record.summary,
            audio_location: record.audio_location,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Complete,
    AudioFailed,
}

/// Which stage failed and why, without provider payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub stage: Stage,
    pub code: ErrorKind,
    pub reason: FailureReason,
    pub message: String,
}

impl From<&StageFailure> for FailureResponse {
    fn from(failure: &StageFailure) -> Self {
        Self {
            stage: failure.stage,
            code: failure.error.kind(),
            reason: failure.error.reason(),
            message: failure.error.guidance(),
        }
    }
}

/// Response for POST /api/podcasts and POST /api/podcasts/:id/audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratePodcastResponse {
    pub podcast: PodcastResponse,
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureResponse>,
    pub ignored_lines: usize,
}

impl From<GenerationOutcome> for GeneratePodcastResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        let status = if outcome.is_complete() {
            GenerationStatus::Complete
        } else {
            GenerationStatus::AudioFailed
        };
        Self {
            failure: outcome.failure.as_ref().map(FailureResponse::from),
            podcast: outcome.record.into(),
            status,
            ignored_lines: outcome.ignored_lines,
        }
    }
}
