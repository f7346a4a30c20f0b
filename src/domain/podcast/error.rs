use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::audio::AudioAssemblyError;

/// Failure taxonomy shared by the pipeline, the provider adapters and the
/// record store. Provider adapters classify at their boundary; nothing
/// upstream re-wraps these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PodcastError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),
    #[error("provider rejected credentials: {0}")]
    ProviderAuth(String),
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("invalid voice identity: {0}")]
    InvalidVoiceIdentity(String),
    #[error("provider returned no usable result: {0}")]
    ProviderEmptyResult(String),
    #[error("no dialogue found in script")]
    NoDialogueFound,
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("podcast not found: {0}")]
    NotFound(String),
    #[error("generation cancelled")]
    Cancelled,
}

/// Stable machine-readable code for each taxonomy entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationError,
    ConfigurationMissing,
    ProviderAuthError,
    ProviderUnavailable,
    RateLimited,
    InvalidVoiceIdentity,
    ProviderEmptyResult,
    NoDialogueFound,
    PersistenceError,
    NotFound,
    Cancelled,
}

/// Coarse caller-facing category a UI can turn into guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    ConfigurationMissing,
    AuthenticationInvalid,
    RateLimited,
    NetworkUnreachable,
    MalformedInput,
    Cancelled,
}

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Script,
    Audio,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Script => write!(f, "script"),
            Stage::Audio => write!(f, "audio"),
        }
    }
}

impl PodcastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            Self::ProviderAuth(_) => ErrorKind::ProviderAuthError,
            Self::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::InvalidVoiceIdentity(_) => ErrorKind::InvalidVoiceIdentity,
            Self::ProviderEmptyResult(_) => ErrorKind::ProviderEmptyResult,
            Self::NoDialogueFound => ErrorKind::NoDialogueFound,
            Self::Persistence(_) => ErrorKind::PersistenceError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn reason(&self) -> FailureReason {
        match self {
            // Voice ids come from configuration, so a rejected one is a config problem
            Self::ConfigurationMissing(_) | Self::InvalidVoiceIdentity(_) => {
                FailureReason::ConfigurationMissing
            }
            Self::ProviderAuth(_) => FailureReason::AuthenticationInvalid,
            Self::RateLimited(_) => FailureReason::RateLimited,
            Self::ProviderUnavailable(_) | Self::Persistence(_) => FailureReason::NetworkUnreachable,
            Self::Validation(_)
            | Self::ProviderEmptyResult(_)
            | Self::NoDialogueFound
            | Self::NotFound(_) => FailureReason::MalformedInput,
            Self::Cancelled => FailureReason::Cancelled,
        }
    }

    /// Actionable message for end users. Never includes provider payloads.
    pub fn guidance(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::ConfigurationMissing(var) => {
                format!("{} is not configured. Add it to the server environment and try again.", var)
            }
            Self::ProviderAuth(_) => {
                "The AI provider rejected the API key. Check your credential configuration.".to_string()
            }
            Self::ProviderUnavailable(_) => {
                "Could not reach the AI provider. Check your network connection and try again.".to_string()
            }
            Self::RateLimited(_) => {
                "The AI provider rate limit was exceeded. Please wait a moment and try again.".to_string()
            }
            Self::InvalidVoiceIdentity(_) => {
                "The speech provider rejected a voice id. Check SPEAKER_A_VOICE_ID and SPEAKER_B_VOICE_ID.".to_string()
            }
            Self::ProviderEmptyResult(_) => {
                "The AI provider returned an empty result. Please try again.".to_string()
            }
            Self::NoDialogueFound => {
                "No dialogue detected. Make sure the script contains ALEX: and EVAN: speaker labels.".to_string()
            }
            Self::Persistence(_) => "Could not save the podcast. Please try again.".to_string(),
            Self::NotFound(_) => "Podcast not found.".to_string(),
            Self::Cancelled => "Generation was cancelled.".to_string(),
        }
    }
}

impl From<AudioAssemblyError> for PodcastError {
    fn from(err: AudioAssemblyError) -> Self {
        match err {
            // Zero chunks means there was nothing to say
            AudioAssemblyError::EmptyInput => PodcastError::NoDialogueFound,
        }
    }
}

/// A classified failure together with the stage that produced it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage failed: {error}")]
pub struct StageFailure {
    pub stage: Stage,
    pub error: PodcastError,
}

impl StageFailure {
    pub fn new(stage: Stage, error: PodcastError) -> Self {
        Self { stage, error }
    }

    pub fn script(error: PodcastError) -> Self {
        Self::new(Stage::Script, error)
    }

    pub fn audio(error: PodcastError) -> Self {
        Self::new(Stage::Audio, error)
    }
}
