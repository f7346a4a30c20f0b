use super::script::SHOW_NAME;
use crate::domain::podcast::{PodcastError, Topic};
use crate::domain::script::Speaker;
use crate::infrastructure::repositories::{CompletionRepository, CompletionRequest};
use std::sync::Arc;

const SUMMARY_MAX_TOKENS: u32 = 150;
const SUMMARY_TEMPERATURE: f32 = 0.7;

const SUMMARY_SYSTEM_PROMPT: &str = "You are a podcast summary writer who creates compelling, concise episode descriptions that entice listeners while accurately representing the content.";

/// Short prose summary of an episode. Never fails: provider errors fall back
/// to a templated summary.
pub struct SummaryGenerationClient {
    completion: Arc<dyn CompletionRepository>,
}

impl SummaryGenerationClient {
    pub fn new(completion: Arc<dyn CompletionRepository>) -> Self {
        Self { completion }
    }

    pub async fn summarize(&self, script: &str, topic: &Topic) -> String {
        match self.try_summarize(script, topic).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, topic = %topic, "Summary generation failed, using fallback");
                fallback_summary(topic)
            }
        }
    }

    async fn try_summarize(&self, script: &str, topic: &Topic) -> Result<String, PodcastError> {
        let request = CompletionRequest {
            system_prompt: SUMMARY_SYSTEM_PROMPT.to_string(),
            user_prompt: summary_prompt(script, topic),
            max_tokens: SUMMARY_MAX_TOKENS,
            temperature: SUMMARY_TEMPERATURE,
        };

        let summary = self.completion.complete(request).await?;
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(PodcastError::ProviderEmptyResult("No summary generated".to_string()));
        }
        Ok(summary.to_string())
    }
}

pub fn summary_prompt(script: &str, topic: &Topic) -> String {
    format!(
        r#"Create a concise, engaging 2-3 sentence summary of this {show} podcast episode about "{topic}".

The summary should:
- Capture the main points discussed by hosts {host} and {cohost}
- Be engaging and make people want to listen
- Highlight what makes this episode interesting or unique
- Use an enthusiastic but professional tone
- Be around 40-60 words total

Podcast Script:
{script}

Write only the summary, no additional text or formatting."#,
        show = SHOW_NAME,
        topic = topic,
        host = Speaker::Alex.display_name(),
        cohost = Speaker::Evan.display_name(),
        script = script,
    )
}

/// Deterministic summary used whenever the provider call fails
pub fn fallback_summary(topic: &Topic) -> String {
    format!(
        "A fascinating discussion between {} and {} exploring {}. The hosts dive deep into the topic, sharing insights and perspectives that make complex ideas accessible and engaging.",
        Speaker::Alex.display_name(),
        Speaker::Evan.display_name(),
        topic.as_str().to_lowercase()
    )
}
