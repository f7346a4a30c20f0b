use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::error::PodcastError;

const MAX_TOPIC_CHARS: usize = 500;

/// A validated, trimmed topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    pub fn parse(raw: &str) -> Result<Self, PodcastError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PodcastError::Validation("Topic is required".to_string()));
        }
        if trimmed.chars().count() > MAX_TOPIC_CHARS {
            return Err(PodcastError::Validation(format!(
                "Topic must be {} characters or less",
                MAX_TOPIC_CHARS
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PodcastRecord {
    pub id: Uuid,
    pub topic: String,
    pub script: String,
    pub summary: Option<String>,
    pub audio_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blob-store key of a podcast's audio
pub fn audio_key(id: Uuid) -> String {
    format!("{}.mp3", id)
}
