use crate::domain::podcast::PodcastError;
use async_trait::async_trait;

/// A single chat-style completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Repository for text completion.
/// Abstracts the language model provider behind script and summary generation.
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// Fails with `ConfigurationMissing` when the provider credential is absent
    fn ensure_configured(&self) -> Result<(), PodcastError> {
        Ok(())
    }

    /// Returns the generated text exactly as the provider produced it.
    /// Empty output is reported as `ProviderEmptyResult`.
    async fn complete(&self, request: CompletionRequest) -> Result<String, PodcastError>;
}
