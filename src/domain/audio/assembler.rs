use super::format::ContainerFormat;

/// Synthesized speech for exactly one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk(Vec<u8>);

impl AudioChunk {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
impl From<Vec<u8>> for AudioChunk {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioAssemblyError {
    #[error("no audio chunks to assemble")]
    EmptyInput,
}

/// Combines per-segment audio into one playable stream.
///
/// Implementations must preserve chunk order.
pub trait AudioAssembler: Send + Sync {
    fn assemble(&self, chunks: Vec<AudioChunk>) -> Result<Vec<u8>, AudioAssemblyError>;
}

/// Byte-level concatenation in input order.
///
/// Only valid while every chunk comes from the same provider and model, so
/// the frames share an encoding and decoders play them back to back. Mixed
/// containers are logged but still concatenated; gapless stitching would need
/// a container-aware assembler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatAssembler;

impl AudioAssembler for ConcatAssembler {
    fn assemble(&self, chunks: Vec<AudioChunk>) -> Result<Vec<u8>, AudioAssemblyError> {
        let first = chunks.first().ok_or(AudioAssemblyError::EmptyInput)?;
        let expected_format = ContainerFormat::sniff(first.as_bytes());

        for (index, chunk) in chunks.iter().enumerate().skip(1) {
            let format = ContainerFormat::sniff(chunk.as_bytes());
            if format != expected_format {
                tracing::warn!(
                    chunk_index = index,
                    expected = %expected_format,
                    found = %format,
                    "Audio chunk container differs from first chunk; concatenated output may not decode cleanly"
                );
            }
        }

        let total_len = chunks.iter().map(AudioChunk::len).sum();
        let mut assembled = Vec::with_capacity(total_len);
        for chunk in chunks {
            assembled.extend_from_slice(chunk.as_bytes());
        }

        tracing::debug!(
            total_bytes = assembled.len(),
            container = %expected_format,
            "Audio chunks assembled"
        );

        Ok(assembled)
    }
}
