use super::speaker::Speaker;
use serde::{Deserialize, Serialize};

/// One attributed utterance extracted from a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub speaker: Speaker,
    pub text: String,
}

impl Segment {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Segments plus the count of non-blank lines that carried no speaker tag
/// (stage directions, headings, narrator asides).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    pub ignored_lines: usize,
}

/// Split a script into ordered speaker segments.
///
/// Untagged lines and tagged lines with an empty utterance are dropped.
/// An empty result is not an error here; the caller decides what it means.
pub fn segment(script: &str) -> Vec<Segment> {
    segment_with_diagnostics(script).segments
}

pub fn segment_with_diagnostics(script: &str) -> Segmentation {
    let mut segmentation = Segmentation::default();

    for line in script.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Speaker::split_tagged(line) {
            Some((speaker, rest)) => {
                let text = rest.trim();
                if !text.is_empty() {
                    segmentation.segments.push(Segment::new(speaker, text));
                }
            }
            None => segmentation.ignored_lines += 1,
        }
    }

    segmentation
}
