use serde::{Deserialize, Serialize};
use std::fmt;

/// The two fixed podcast hosts.
///
/// The script convention (`ALEX:` / `EVAN:` line prefixes) is defined here and
/// nowhere else: the generation prompt and the segmenter both read it from
/// this type, so renaming a host only touches this file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Speaker {
    Alex,
    Evan,
}

impl Speaker {
    pub const ALL: [Speaker; 2] = [Speaker::Alex, Speaker::Evan];

    /// Line prefix marking an utterance by this host
    pub fn tag(self) -> &'static str {
        match self {
            Speaker::Alex => "ALEX:",
            Speaker::Evan => "EVAN:",
        }
    }

    /// Name used in prose (prompts, summaries)
    pub fn display_name(self) -> &'static str {
        match self {
            Speaker::Alex => "Alex",
            Speaker::Evan => "Evan",
        }
    }

    /// Match a trimmed line against the speaker tags (case-sensitive).
    /// Returns the speaker and the untrimmed remainder after the tag.
    pub fn split_tagged(line: &str) -> Option<(Speaker, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|speaker| line.strip_prefix(speaker.tag()).map(|rest| (speaker, rest)))
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Alex => write!(f, "ALEX"),
            Speaker::Evan => write!(f, "EVAN"),
        }
    }
}
