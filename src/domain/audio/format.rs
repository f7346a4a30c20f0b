use std::fmt;

/// Container family recognised from the leading bytes of an audio buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// MP3, either with an ID3v2 tag or starting on an MPEG frame sync
    Mpeg,
    Wav,
    Ogg,
    Flac,
    Unknown,
}

impl ContainerFormat {
    pub fn sniff(data: &[u8]) -> Self {
        match data {
            [b'I', b'D', b'3', ..] => Self::Mpeg,
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => Self::Mpeg,
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Self::Wav,
            [b'O', b'g', b'g', b'S', ..] => Self::Ogg,
            [b'f', b'L', b'a', b'C', ..] => Self::Flac,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mpeg => "mpeg",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}
