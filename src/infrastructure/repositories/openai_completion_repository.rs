use super::completion_repository::{CompletionRepository, CompletionRequest};
use crate::domain::podcast::PodcastError;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;

/// OpenAI chat completion implementation of completion repository
pub struct OpenAiCompletionRepository {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    timeout: Duration,
}

impl OpenAiCompletionRepository {
    pub fn new(
        api_key: Option<String>,
        api_base: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Self {
        let client = api_key.map(|key| {
            let mut config = OpenAIConfig::new().with_api_key(key);
            if let Some(base) = api_base {
                config = config.with_api_base(base);
            }
            Client::with_config(config)
        });

        Self {
            client,
            model,
            timeout,
        }
    }

    fn client(&self) -> Result<&Client<OpenAIConfig>, PodcastError> {
        self.client
            .as_ref()
            .ok_or_else(|| PodcastError::ConfigurationMissing("COMPLETION_API_KEY".to_string()))
    }
}

/// Classify an API-level error body (the provider returns no status code here)
fn classify_api_error(message: &str, error_type: Option<&str>) -> PodcastError {
    let lowered = message.to_lowercase();

    if matches!(error_type, Some("requests" | "tokens" | "insufficient_quota"))
        || lowered.contains("rate limit")
        || lowered.contains("quota")
    {
        return PodcastError::RateLimited(message.to_string());
    }

    if matches!(error_type, Some("authentication_error"))
        || lowered.contains("api key")
        || lowered.contains("unauthorized")
    {
        return PodcastError::ProviderAuth(message.to_string());
    }

    PodcastError::ProviderUnavailable(message.to_string())
}

fn classify_openai_error(err: OpenAIError) -> PodcastError {
    match err {
        OpenAIError::Reqwest(e) => match e.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => PodcastError::ProviderAuth(e.to_string()),
            Some(429) => PodcastError::RateLimited(e.to_string()),
            _ => PodcastError::ProviderUnavailable(e.to_string()),
        },
        OpenAIError::ApiError(api) => classify_api_error(&api.message, api.r#type.as_deref()),
        OpenAIError::JSONDeserialize(e) => {
            PodcastError::ProviderUnavailable(format!("malformed completion response: {}", e))
        }
        OpenAIError::InvalidArgument(msg) => PodcastError::Validation(msg),
        other => PodcastError::ProviderUnavailable(other.to_string()),
    }
}

#[async_trait]
impl CompletionRepository for OpenAiCompletionRepository {
    fn ensure_configured(&self) -> Result<(), PodcastError> {
        self.client().map(|_| ())
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, PodcastError> {
        let client = self.client()?;
        let start_time = std::time::Instant::now();

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt)
                .build()
                .map_err(classify_openai_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user_prompt)
                .build()
                .map_err(classify_openai_error)?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .messages(messages)
            .build()
            .map_err(classify_openai_error)?;

        tracing::debug!(
            model = %self.model,
            max_tokens = request.max_tokens,
            "Calling OpenAI chat completion API"
        );

        let response = tokio::time::timeout(self.timeout, client.chat().create(chat_request))
            .await
            .map_err(|_| {
                tracing::error!(
                    model = %self.model,
                    timeout_secs = self.timeout.as_secs(),
                    "OpenAI chat completion timed out"
                );
                PodcastError::ProviderUnavailable("completion request timed out".to_string())
            })?
            .map_err(|e| {
                tracing::error!(error = %e, model = %self.model, "OpenAI chat completion failed");
                classify_openai_error(e)
            })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                PodcastError::ProviderEmptyResult("completion returned no text".to_string())
            })?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            output_length = content.len(),
            "Completion received"
        );

        Ok(content)
    }
}
