use serde::{Deserialize, Serialize};

const PROGRESSIVE_QUALITY: &str = "progressive";

/// A single rendition the host exposes, either as a download or as a
/// playback file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoVariant {
    pub quality: String,
    pub rendition: String,
    pub link: Option<String>,
    pub kind: Option<String>,
}

impl VideoVariant {
    fn usable_link(&self) -> Option<&str> {
        self.link.as_deref().filter(|link| !link.trim().is_empty())
    }

    fn matches_quality(&self, token: &str) -> bool {
        self.quality.to_ascii_lowercase().contains(token)
            || self.rendition.to_ascii_lowercase().contains(token)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoVariants {
    pub downloads: Vec<VideoVariant>,
    pub playback: Vec<VideoVariant>,
}

impl VideoVariants {
    /// Preferred quality first, otherwise the first download that has a link.
    pub fn select_download(&self, preferred_quality: &str) -> Option<String> {
        let token = preferred_quality.to_ascii_lowercase();

        self.downloads
            .iter()
            .filter(|variant| variant.matches_quality(&token))
            .find_map(VideoVariant::usable_link)
            .or_else(|| self.downloads.iter().find_map(VideoVariant::usable_link))
            .map(str::to_string)
    }

    /// Preferred quality first, otherwise any progressive file.
    pub fn select_playback(&self, preferred_quality: &str) -> Option<String> {
        let token = preferred_quality.to_ascii_lowercase();

        self.playback
            .iter()
            .filter(|variant| variant.matches_quality(&token))
            .find_map(VideoVariant::usable_link)
            .or_else(|| {
                self.playback
                    .iter()
                    .filter(|variant| variant.matches_quality(PROGRESSIVE_QUALITY))
                    .find_map(VideoVariant::usable_link)
            })
            .map(str::to_string)
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty() && self.playback.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLinks {
    pub download_url: String,
    pub playback_url: String,
}

impl VideoLinks {
    /// When only one side resolved, that URL is reused for both.
    pub fn from_partial(download_url: Option<String>, playback_url: Option<String>) -> Option<Self> {
        match (download_url, playback_url) {
            (Some(download_url), Some(playback_url)) => Some(Self {
                download_url,
                playback_url,
            }),
            (Some(url), None) | (None, Some(url)) => Some(Self {
                download_url: url.clone(),
                playback_url: url,
            }),
            (None, None) => None,
        }
    }
}

/// Final outcome of a successful upload workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedVideo {
    pub video_id: String,
    pub video_uri: String,
    #[serde(flatten)]
    pub links: VideoLinks,
}
