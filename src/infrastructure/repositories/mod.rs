pub mod blob_store;
pub mod completion_repository;
pub mod elevenlabs_tts_repository;
pub mod local_blob_store;
pub mod memory;
pub mod openai_completion_repository;
pub mod pg_podcast_repository;
pub mod podcast_repository;
pub mod tts_repository;

pub use blob_store::BlobStore;
pub use completion_repository::{CompletionRepository, CompletionRequest};
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use local_blob_store::LocalBlobStore;
pub use memory::{InMemoryBlobStore, InMemoryPodcastRepository};
pub use openai_completion_repository::OpenAiCompletionRepository;
pub use pg_podcast_repository::PgPodcastRepository;
pub use podcast_repository::PodcastRepository;
pub use tts_repository::TtsRepository;
