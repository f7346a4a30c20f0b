use async_trait::async_trait;
use podcast_backend::domain::podcast::PodcastError;
use podcast_backend::infrastructure::repositories::{
    CompletionRepository, CompletionRequest, TtsRepository,
};
use std::sync::Mutex;

pub const OCEAN_SCRIPT: &str = "ALEX: Welcome to Brainwaves! Today we're talking ocean conservation.\n\
EVAN: It's one of my favorite topics, Alex.\n\
(both laugh)\n\
ALEX: Thank you for riding the Brainwaves with me and Evan!";

pub const SUMMARY: &str = "Alex and Evan explore why healthy oceans matter.";

/// Completion provider with canned replies for the script and summary prompts
pub struct FakeCompletion {
    script: Result<String, PodcastError>,
    configured: bool,
}

impl FakeCompletion {
    pub fn replying(script: &str) -> Self {
        Self {
            script: Ok(script.to_string()),
            configured: true,
        }
    }

    pub fn failing(error: PodcastError) -> Self {
        Self {
            script: Err(error),
            configured: true,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            script: Err(PodcastError::ProviderUnavailable("not reachable".to_string())),
            configured: false,
        }
    }
}

#[async_trait]
impl CompletionRepository for FakeCompletion {
    fn ensure_configured(&self) -> Result<(), PodcastError> {
        if self.configured {
            Ok(())
        } else {
            Err(PodcastError::ConfigurationMissing("COMPLETION_API_KEY".to_string()))
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, PodcastError> {
        if request.user_prompt.contains("summary") {
            return Ok(SUMMARY.to_string());
        }
        self.script.clone()
    }
}

/// Speech provider returning a tiny MPEG frame per call, optionally failing on the n-th call
pub struct FakeTts {
    fail_at: Option<(usize, PodcastError)>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeTts {
    pub fn working() -> Self {
        Self {
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(call: usize, error: PodcastError) -> Self {
        Self {
            fail_at: Some((call, error)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn mock_audio_bytes(call: usize) -> Vec<u8> {
    // MPEG frame header followed by a marker byte
    vec![0xFF, 0xFB, 0x90, 0x00, call as u8]
}

#[async_trait]
impl TtsRepository for FakeTts {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, PodcastError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), voice_id.to_string()));
            calls.len()
        };

        match &self.fail_at {
            Some((n, error)) if *n == call => Err(error.clone()),
            _ => Ok(mock_audio_bytes(call)),
        }
    }
}
