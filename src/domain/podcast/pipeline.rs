use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::error::{ErrorKind, FailureReason, PodcastError, Stage, StageFailure};
use super::model::{audio_key, PodcastRecord, Topic};
use crate::domain::audio::{AudioAssembler, AudioChunk, AUDIO_CONTENT_TYPE};
use crate::domain::generation::{ScriptGenerationClient, SummaryGenerationClient};
use crate::domain::script::{segment_with_diagnostics, Segment, Speaker};
use crate::infrastructure::repositories::{
    BlobStore, CompletionRepository, PodcastRepository, TtsRepository,
};

/// Observable state of one generation run.
///
/// A run that has not started has no state; a rejected topic never publishes one.
/// `Complete` and `Failed` are terminal; nothing is published after them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PipelineState {
    ScriptPending,
    ScriptReady {
        record_id: Uuid,
    },
    AudioPending {
        record_id: Uuid,
        completed: usize,
        total: usize,
    },
    Complete {
        record_id: Uuid,
        audio_location: String,
    },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        record_id: Option<Uuid>,
        stage: Stage,
        code: ErrorKind,
        reason: FailureReason,
        message: String,
    },
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }

    fn failed(record_id: Option<Uuid>, failure: &StageFailure) -> Self {
        Self::Failed {
            record_id,
            stage: failure.stage,
            code: failure.error.kind(),
            reason: failure.error.reason(),
            message: failure.error.guidance(),
        }
    }
}

/// Per-run cancellation and progress reporting.
///
/// Every state transition is queued, so a slow reader still sees each one in order.
pub struct GenerationContext {
    cancel: CancellationToken,
    progress: mpsc::UnboundedSender<PipelineState>,
}

impl GenerationContext {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PipelineState>) {
        let (progress, receiver) = mpsc::unbounded_channel();
        let ctx = Self {
            cancel: CancellationToken::new(),
            progress,
        };
        (ctx, receiver)
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn publish(&self, state: PipelineState) {
        tracing::debug!(state = ?state, "Pipeline state changed");
        // Nobody listening is fine
        let _ = self.progress.send(state);
    }

    fn check_cancelled(&self) -> Result<(), PodcastError> {
        if self.cancel.is_cancelled() {
            return Err(PodcastError::Cancelled);
        }
        Ok(())
    }

    /// Await `operation` unless the run is cancelled first
    async fn guard<T, F>(&self, operation: F) -> Result<T, PodcastError>
    where
        F: Future<Output = Result<T, PodcastError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PodcastError::Cancelled),
            result = operation => result,
        }
    }
}

/// Speaker to provider voice identity mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceMap {
    alex: Option<String>,
    evan: Option<String>,
}

impl VoiceMap {
    pub fn new(alex: Option<String>, evan: Option<String>) -> Self {
        let present = |v: Option<String>| v.filter(|id| !id.trim().is_empty());
        Self {
            alex: present(alex),
            evan: present(evan),
        }
    }

    /// Environment variable that configures the voice of `speaker`
    pub fn variable_for(speaker: Speaker) -> &'static str {
        match speaker {
            Speaker::Alex => "SPEAKER_A_VOICE_ID",
            Speaker::Evan => "SPEAKER_B_VOICE_ID",
        }
    }

    pub fn voice_for(&self, speaker: Speaker) -> Result<&str, PodcastError> {
        let voice = match speaker {
            Speaker::Alex => self.alex.as_deref(),
            Speaker::Evan => self.evan.as_deref(),
        };
        voice.ok_or_else(|| PodcastError::ConfigurationMissing(Self::variable_for(speaker).to_string()))
    }

    pub fn ensure_complete(&self) -> Result<(), PodcastError> {
        for speaker in Speaker::ALL {
            self.voice_for(speaker)?;
        }
        Ok(())
    }
}

/// Result of a run that got far enough to persist a record.
///
/// `failure` is set when audio production failed; the record (with its
/// script) is still saved and returned.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub record: PodcastRecord,
    pub state: PipelineState,
    pub failure: Option<StageFailure>,
    pub ignored_lines: usize,
}

impl GenerationOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct PodcastPipeline {
    script_client: ScriptGenerationClient,
    summary_client: SummaryGenerationClient,
    tts: Arc<dyn TtsRepository>,
    assembler: Arc<dyn AudioAssembler>,
    records: Arc<dyn PodcastRepository>,
    blobs: Arc<dyn BlobStore>,
    voices: VoiceMap,
}

impl PodcastPipeline {
    pub fn new(
        completion: Arc<dyn CompletionRepository>,
        tts: Arc<dyn TtsRepository>,
        assembler: Arc<dyn AudioAssembler>,
        records: Arc<dyn PodcastRepository>,
        blobs: Arc<dyn BlobStore>,
        voices: VoiceMap,
    ) -> Self {
        Self {
            script_client: ScriptGenerationClient::new(completion.clone()),
            summary_client: SummaryGenerationClient::new(completion),
            tts,
            assembler,
            records,
            blobs,
            voices,
        }
    }

    /// Fails with `ConfigurationMissing` naming the first absent setting
    pub fn check_configured(&self) -> Result<(), PodcastError> {
        self.script_client.ensure_configured()?;
        self.check_audio_configured()
    }

    fn check_audio_configured(&self) -> Result<(), PodcastError> {
        self.tts.ensure_configured()?;
        self.voices.ensure_complete()
    }

    /// Run the full pipeline for a raw topic.
    ///
    /// An invalid topic is rejected before any state transition.
    pub async fn generate(
        &self,
        raw_topic: &str,
        ctx: &GenerationContext,
    ) -> Result<GenerationOutcome, StageFailure> {
        let topic = Topic::parse(raw_topic).map_err(StageFailure::script)?;
        self.generate_topic(topic, ctx).await
    }

    pub async fn generate_topic(
        &self,
        topic: Topic,
        ctx: &GenerationContext,
    ) -> Result<GenerationOutcome, StageFailure> {
        ctx.publish(PipelineState::ScriptPending);

        let record = match self.produce_script(&topic, ctx).await {
            Ok(record) => record,
            Err(error) => {
                let failure = StageFailure::script(error);
                tracing::warn!(topic = %topic, error = %failure.error, "Script stage failed");
                ctx.publish(PipelineState::failed(None, &failure));
                return Err(failure);
            }
        };

        ctx.publish(PipelineState::ScriptReady { record_id: record.id });

        let record = match self.attach_summary(record, &topic, ctx).await {
            Ok(record) => record,
            Err((record, error)) => return Ok(self.fail_audio(record, error, 0, ctx)),
        };

        Ok(self.produce_audio(record, ctx).await)
    }

    /// Re-run audio production for a saved record, starting from `ScriptReady`
    pub async fn resume(&self, record: PodcastRecord, ctx: &GenerationContext) -> GenerationOutcome {
        if let Some(location) = record.audio_location.clone() {
            tracing::info!(podcast_id = %record.id, "Audio already present, nothing to resume");
            let state = PipelineState::Complete {
                record_id: record.id,
                audio_location: location,
            };
            ctx.publish(state.clone());
            return GenerationOutcome {
                record,
                state,
                failure: None,
                ignored_lines: 0,
            };
        }

        ctx.publish(PipelineState::ScriptReady { record_id: record.id });
        self.produce_audio(record, ctx).await
    }

    async fn produce_script(
        &self,
        topic: &Topic,
        ctx: &GenerationContext,
    ) -> Result<PodcastRecord, PodcastError> {
        self.check_configured()?;
        ctx.check_cancelled()?;

        let script = ctx.guard(self.script_client.generate(topic)).await?;

        // Once the insert is issued it runs to completion so a stored record is never unreported
        ctx.check_cancelled()?;
        let record = self.records.create(topic.as_str(), &script).await?;

        tracing::info!(podcast_id = %record.id, topic = %topic, "Podcast record created");
        Ok(record)
    }

    /// Summaries never fail the run; only cancellation interrupts here
    async fn attach_summary(
        &self,
        mut record: PodcastRecord,
        topic: &Topic,
        ctx: &GenerationContext,
    ) -> Result<PodcastRecord, (PodcastRecord, PodcastError)> {
        let summarized = ctx
            .guard(async { Ok::<_, PodcastError>(self.summary_client.summarize(&record.script, topic).await) })
            .await;
        let summary = match summarized {
            Ok(summary) => summary,
            Err(error) => return Err((record, error)),
        };

        match self.records.update_summary(record.id, &summary).await {
            Ok(()) => record.summary = Some(summary),
            Err(e) => {
                tracing::warn!(podcast_id = %record.id, error = %e, "Failed to save summary");
            }
        }

        Ok(record)
    }

    async fn produce_audio(&self, mut record: PodcastRecord, ctx: &GenerationContext) -> GenerationOutcome {
        let segmentation = segment_with_diagnostics(&record.script);
        let ignored_lines = segmentation.ignored_lines;
        if ignored_lines > 0 {
            tracing::info!(
                podcast_id = %record.id,
                ignored_lines = ignored_lines,
                "Ignored non-dialogue script lines"
            );
        }

        let total = segmentation.segments.len();
        let started = Instant::now();
        let produced = self.run_audio(record.id, &segmentation.segments, ctx).await;

        match produced {
            Ok(location) => {
                tracing::info!(
                    podcast_id = %record.id,
                    segments = total,
                    audio_location = %location,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Podcast audio complete"
                );
                record.audio_location = Some(location.clone());
                let state = PipelineState::Complete {
                    record_id: record.id,
                    audio_location: location,
                };
                ctx.publish(state.clone());
                GenerationOutcome {
                    record,
                    state,
                    failure: None,
                    ignored_lines,
                }
            }
            Err(error) => self.fail_audio(record, error, ignored_lines, ctx),
        }
    }

    async fn run_audio(
        &self,
        record_id: Uuid,
        segments: &[Segment],
        ctx: &GenerationContext,
    ) -> Result<String, PodcastError> {
        if segments.is_empty() {
            return Err(PodcastError::NoDialogueFound);
        }
        self.check_audio_configured()?;

        let total = segments.len();
        ctx.publish(PipelineState::AudioPending {
            record_id,
            completed: 0,
            total,
        });

        // One request at a time, in script order
        let mut chunks = Vec::with_capacity(total);
        for (index, segment) in segments.iter().enumerate() {
            ctx.check_cancelled()?;
            let voice = self.voices.voice_for(segment.speaker)?;
            let bytes = ctx
                .guard(self.tts.synthesize(&segment.text, voice))
                .await
                .map_err(|e| {
                    tracing::warn!(
                        podcast_id = %record_id,
                        segment = index + 1,
                        total = total,
                        speaker = %segment.speaker,
                        error = %e,
                        "Segment synthesis failed"
                    );
                    e
                })?;

            tracing::debug!(
                podcast_id = %record_id,
                segment = index + 1,
                total = total,
                size_bytes = bytes.len(),
                "Segment synthesized"
            );
            chunks.push(AudioChunk::new(bytes));
            ctx.publish(PipelineState::AudioPending {
                record_id,
                completed: index + 1,
                total,
            });
        }

        let audio = self.assembler.assemble(chunks)?;
        ctx.check_cancelled()?;
        self.store_audio(record_id, audio, ctx).await
    }

    /// Upload then point the record at the upload; a failed update removes the upload again
    async fn store_audio(
        &self,
        id: Uuid,
        audio: Vec<u8>,
        ctx: &GenerationContext,
    ) -> Result<String, PodcastError> {
        let key = audio_key(id);
        let size_bytes = audio.len();
        let location = ctx
            .guard(self.blobs.put(&key, audio, AUDIO_CONTENT_TYPE))
            .await?;

        if let Err(e) = self.records.update_audio_location(id, &location).await {
            if let Err(cleanup) = self.blobs.delete(&key).await {
                tracing::warn!(podcast_id = %id, error = %cleanup, "Failed to remove orphaned audio blob");
            }
            return Err(e);
        }

        tracing::debug!(podcast_id = %id, size_bytes = size_bytes, "Audio stored");
        Ok(location)
    }

    fn fail_audio(
        &self,
        record: PodcastRecord,
        error: PodcastError,
        ignored_lines: usize,
        ctx: &GenerationContext,
    ) -> GenerationOutcome {
        let failure = StageFailure::audio(error);
        tracing::warn!(podcast_id = %record.id, error = %failure.error, "Audio stage failed");
        let state = PipelineState::failed(Some(record.id), &failure);
        ctx.publish(state.clone());
        GenerationOutcome {
            record,
            state,
            failure: Some(failure),
            ignored_lines,
        }
    }
}
