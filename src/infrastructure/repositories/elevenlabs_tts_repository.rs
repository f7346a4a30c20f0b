use super::tts_repository::TtsRepository;
use crate::domain::audio::AUDIO_CONTENT_TYPE;
use crate::domain::podcast::PodcastError;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
            style: 0.5,
            use_speaker_boost: true,
        }
    }
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model_id: String,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model_id: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model_id,
        })
    }

    fn api_key(&self) -> Result<&str, PodcastError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PodcastError::ConfigurationMissing("SPEECH_API_KEY".to_string()))
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

/// Map a non-success provider status to the taxonomy
fn classify_status(status: StatusCode, voice_id: &str) -> PodcastError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PodcastError::ProviderAuth(format!("speech provider returned {}", status))
        }
        StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            PodcastError::InvalidVoiceIdentity(format!("voice {} rejected ({})", voice_id, status))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            PodcastError::RateLimited(format!("speech provider returned {}", status))
        }
        _ => PodcastError::ProviderUnavailable(format!("speech provider returned {}", status)),
    }
}

fn classify_transport_error(err: &reqwest::Error) -> PodcastError {
    if err.is_timeout() {
        PodcastError::ProviderUnavailable("speech request timed out".to_string())
    } else {
        PodcastError::ProviderUnavailable(format!("speech request failed: {}", err))
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    fn ensure_configured(&self) -> Result<(), PodcastError> {
        self.api_key().map(|_| ())
    }

    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, PodcastError> {
        let api_key = self.api_key()?;
        if text.trim().is_empty() {
            return Err(PodcastError::Validation("Utterance text is empty".to_string()));
        }

        let start_time = std::time::Instant::now();
        tracing::debug!(
            voice_id = voice_id,
            model_id = %self.model_id,
            text_length = text.len(),
            text_preview = %text.chars().take(50).collect::<String>(),
            "Calling ElevenLabs TTS API"
        );

        let request = SpeechRequest {
            text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings::default(),
        };

        let response = self
            .http
            .post(self.endpoint(voice_id))
            .header("xi-api-key", api_key)
            .header(header::ACCEPT, AUDIO_CONTENT_TYPE)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice_id = voice_id, "ElevenLabs TTS request failed");
                classify_transport_error(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                voice_id = voice_id,
                body = %body,
                "ElevenLabs TTS API call failed"
            );
            return Err(classify_status(status, voice_id));
        }

        let audio = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, voice_id = voice_id, "Failed to read ElevenLabs audio body");
            classify_transport_error(&e)
        })?;

        if audio.is_empty() {
            return Err(PodcastError::ProviderEmptyResult(
                "speech provider returned no audio".to_string(),
            ));
        }

        tracing::info!(
            provider = "elevenlabs",
            voice_id = voice_id,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = audio.len(),
            "TTS segment synthesized"
        );

        Ok(audio.to_vec())
    }
}
