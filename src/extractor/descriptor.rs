use std::sync::Arc;

use serde::Deserialize;

/// Resolved media descriptor: the nested result the extraction tool dumps for
/// a single video. Every field is optional, the tool reports whatever the host
/// exposes for that URL.
#[derive(Debug, Deserialize)]
pub struct MediaDescriptor {
    pub title: Option<Arc<str>>,
    pub thumbnail: Option<Arc<str>>,
    pub duration: Option<f64>,
    pub ext: Option<Arc<str>>,
    pub url: Option<Arc<str>>,
    #[serde(default)]
    pub requested_formats: Vec<MediaFormat>,
    #[serde(default)]
    pub formats: Vec<MediaFormat>,
}

/// A single encoded stream variant offered by the source video.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaFormat {
    pub format_id: Option<Arc<str>>,
    pub ext: Option<Arc<str>>,
    pub height: Option<u64>,
    pub filesize: Option<u64>,
    pub abr: Option<f64>,
    pub vcodec: Option<Arc<str>>,
    pub acodec: Option<Arc<str>>,
    pub url: Option<Arc<str>>,
}

impl MediaFormat {
    /// The tool reports a missing codec as the literal string "none".
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref().map_or(false, |codec| codec != "none")
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref().map_or(false, |codec| codec != "none")
    }

    fn direct_url(&self) -> Option<&Arc<str>> {
        self.url.as_ref().filter(|url| !url.is_empty())
    }
}

impl MediaDescriptor {
    /// Pick the single playable URL for this descriptor.
    ///
    /// Precedence: the direct `url` field, then the first entry of
    /// `requested_formats`, then the first entry of `formats` that carries a
    /// non-empty URL.
    pub fn resolve_download_url(&self) -> Option<Arc<str>> {
        if let Some(url) = self.url.as_ref().filter(|url| !url.is_empty()) {
            return Some(Arc::clone(url));
        }

        if let Some(url) = self.requested_formats.first().and_then(MediaFormat::direct_url) {
            return Some(Arc::clone(url));
        }

        self.formats
            .iter()
            .find_map(|format| format.direct_url().map(Arc::clone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn descriptor(value: serde_json::Value) -> MediaDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_direct_url_wins() {
        let info = descriptor(json!({
            "title": "some video",
            "url": "https://cdn.example.com/direct",
            "requested_formats": [{ "url": "https://cdn.example.com/requested" }],
            "formats": [{ "url": "https://cdn.example.com/listed" }],
        }));

        assert_eq!(
            info.resolve_download_url().as_deref(),
            Some("https://cdn.example.com/direct")
        );
    }

    #[test]
    fn test_requested_formats_beat_format_list() {
        let info = descriptor(json!({
            "requested_formats": [{ "url": "https://cdn.example.com/requested" }],
            "formats": [{ "url": "https://cdn.example.com/listed" }],
        }));

        assert_eq!(
            info.resolve_download_url().as_deref(),
            Some("https://cdn.example.com/requested")
        );
    }

    #[test]
    fn test_format_list_skips_entries_without_url() {
        let info = descriptor(json!({
            "formats": [
                { "format_id": "sb0" },
                { "format_id": "133", "url": "" },
                { "format_id": "18", "url": "https://cdn.example.com/18" },
                { "format_id": "22", "url": "https://cdn.example.com/22" },
            ],
        }));

        assert_eq!(
            info.resolve_download_url().as_deref(),
            Some("https://cdn.example.com/18")
        );
    }

    #[test]
    fn test_no_candidate_resolves_to_none() {
        let info = descriptor(json!({
            "title": "manifest only",
            "url": "",
            "formats": [{ "format_id": "hls", "url": "" }],
        }));

        assert_eq!(info.resolve_download_url(), None);
    }

    #[test]
    fn test_codec_presence() {
        let merged: MediaFormat = serde_json::from_value(json!({
            "format_id": "18", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2"
        }))
        .unwrap();
        assert_eq!((merged.has_video(), merged.has_audio()), (true, true));

        let audio_only: MediaFormat = serde_json::from_value(json!({
            "format_id": "140", "vcodec": "none", "acodec": "mp4a.40.2"
        }))
        .unwrap();
        assert_eq!((audio_only.has_video(), audio_only.has_audio()), (false, true));

        let unreported: MediaFormat = serde_json::from_value(json!({ "format_id": "sb0" })).unwrap();
        assert_eq!((unreported.has_video(), unreported.has_audio()), (false, false));
    }
}
