pub mod assembler;
pub mod format;

pub use assembler::{AudioAssembler, AudioAssemblyError, AudioChunk, ConcatAssembler};
pub use format::ContainerFormat;

/// Content type of assembled podcast audio
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
