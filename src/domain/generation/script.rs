use crate::domain::podcast::{PodcastError, Topic};
use crate::domain::script::Speaker;
use crate::infrastructure::repositories::{CompletionRepository, CompletionRequest};
use std::sync::Arc;

pub const SHOW_NAME: &str = "Brainwaves";

const SCRIPT_MAX_TOKENS: u32 = 2000;
const SCRIPT_TEMPERATURE: f32 = 0.7;

const SCRIPT_SYSTEM_PROMPT: &str = "You are a podcast script writer who creates natural, engaging conversations between two hosts. Focus on making the dialogue feel authentic and conversational, not scripted.";

/// Turns a topic into a two-host dialogue script
pub struct ScriptGenerationClient {
    completion: Arc<dyn CompletionRepository>,
}

impl ScriptGenerationClient {
    pub fn new(completion: Arc<dyn CompletionRepository>) -> Self {
        Self { completion }
    }

    pub fn ensure_configured(&self) -> Result<(), PodcastError> {
        self.completion.ensure_configured()
    }

    pub async fn generate(&self, topic: &Topic) -> Result<String, PodcastError> {
        let request = CompletionRequest {
            system_prompt: SCRIPT_SYSTEM_PROMPT.to_string(),
            user_prompt: script_prompt(topic),
            max_tokens: SCRIPT_MAX_TOKENS,
            temperature: SCRIPT_TEMPERATURE,
        };

        let script = self.completion.complete(request).await?;
        let script = script.trim();
        if script.is_empty() {
            return Err(PodcastError::ProviderEmptyResult("No script generated".to_string()));
        }

        tracing::info!(topic = %topic, script_length = script.len(), "Script generated");
        Ok(script.to_string())
    }
}

/// Fixed prompt template, parameterized only by topic
pub fn script_prompt(topic: &Topic) -> String {
    let host = Speaker::Alex.display_name();
    let cohost = Speaker::Evan.display_name();

    format!(
        r#"Create a natural, conversational 3-5 minute podcast script for "{show}" with hosts {host} and {cohost} discussing: {topic}

Requirements:
- {host} starts with opening introduction mentioning "{show}"
- Natural, engaging dialogue with balanced contributions
- Clear speaker labels ({host_tag} and {cohost_tag}) at the start of every spoken line
- Casual, friendly tone between hosts
- Include natural transitions and conversational elements
- {host} closes with "Thank you for riding the {show} with me and {cohost}!"
- Format for text-to-speech with proper pacing and natural pauses

Structure:
1. Opening ({host} introduces the podcast)
2. Topic introduction and discussion
3. Main conversation with back-and-forth dialogue
4. Closing remarks ({host} with signature sign-off)

Make it sound like two friends having an interesting conversation, not a formal interview."#,
        show = SHOW_NAME,
        host = host,
        cohost = cohost,
        host_tag = Speaker::Alex.tag(),
        cohost_tag = Speaker::Evan.tag(),
        topic = topic,
    )
}
