use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    /// Absent selects the in-memory record store
    pub database_url: Option<String>,
    // Completion provider
    pub completion_api_key: Option<String>,
    pub completion_api_base: Option<String>,
    pub completion_model: String,
    // Speech provider
    pub speech_api_key: Option<String>,
    pub speech_api_base: String,
    pub speech_model_id: String,
    pub speaker_a_voice_id: Option<String>,
    pub speaker_b_voice_id: Option<String>,
    pub provider_timeout_secs: u64,
    // Audio storage
    pub audio_storage_dir: PathBuf,
    pub audio_public_base_url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Set and non-blank
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn or_default(name: &str, default: &str) -> String {
    optional(name).unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: or_default("HOST", "0.0.0.0"),
            port: or_default("PORT", "8080")
                .parse()
                .context("PORT must be a valid port number")?,
            environment: match or_default("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match or_default("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            database_url: optional("DATABASE_URL"),
            completion_api_key: optional("COMPLETION_API_KEY"),
            completion_api_base: optional("COMPLETION_API_BASE"),
            completion_model: or_default("COMPLETION_MODEL", "gpt-4"),
            speech_api_key: optional("SPEECH_API_KEY"),
            speech_api_base: or_default("SPEECH_API_BASE", "https://api.elevenlabs.io"),
            speech_model_id: or_default("SPEECH_MODEL_ID", "eleven_monolingual_v1"),
            speaker_a_voice_id: optional("SPEAKER_A_VOICE_ID"),
            speaker_b_voice_id: optional("SPEAKER_B_VOICE_ID"),
            provider_timeout_secs: or_default("PROVIDER_TIMEOUT_SECS", "60")
                .parse()
                .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?,
            audio_storage_dir: PathBuf::from(or_default("AUDIO_STORAGE_DIR", "./data/audio")),
            audio_public_base_url: or_default("AUDIO_PUBLIC_BASE_URL", "/audio"),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Required provider settings that are absent, by variable name
    pub fn missing_provider_settings(&self) -> Vec<&'static str> {
        [
            ("COMPLETION_API_KEY", &self.completion_api_key),
            ("SPEECH_API_KEY", &self.speech_api_key),
            ("SPEAKER_A_VOICE_ID", &self.speaker_a_voice_id),
            ("SPEAKER_B_VOICE_ID", &self.speaker_b_voice_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}
