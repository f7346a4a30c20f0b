use crate::domain::podcast::PodcastError;
use async_trait::async_trait;

/// Repository for speech synthesis.
/// Abstracts the underlying TTS provider (ElevenLabs, OpenAI, etc.)
///
/// Implementations are responsible for:
/// - One outbound request per call, bounded by a timeout
/// - Classifying provider failures into the podcast error taxonomy
///   (auth, invalid voice, rate limit, unavailable)
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Fails with `ConfigurationMissing` when the provider credential is absent
    fn ensure_configured(&self) -> Result<(), PodcastError> {
        Ok(())
    }

    /// Synthesize one utterance with the given provider voice
    ///
    /// Returns encoded audio bytes (MP3)
    ///
    /// # Arguments
    /// * `text` - A single non-empty utterance
    /// * `voice_id` - Provider-specific voice identity
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, PodcastError>;
}
