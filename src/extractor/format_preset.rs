/// Option preset handed to the extraction tool when resolving a download URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPreset {
    /// Best video capped at 720p, preferring a combined mp4 stream.
    Mp4,
    /// Best audio-only stream.
    Mp3,
}

impl FormatPreset {
    pub fn from_request(format: &str) -> Self {
        match format {
            "mp3" => Self::Mp3,
            _ => Self::Mp4,
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            Self::Mp3 => "bestaudio/best",
            Self::Mp4 => "best[height<=720][ext=mp4]/best[height<=720]/best",
        }
    }
}
