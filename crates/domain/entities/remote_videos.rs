use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// What the hosting API answered when asked to create a video entry.
/// Both fields are optional on the wire; a usable entry needs both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedVideo {
    pub uri: Option<String>,
    pub upload_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVideoHandle {
    pub uri: String,
    pub upload_link: String,
}

impl RemoteVideoHandle {
    pub fn new(uri: impl Into<String>, upload_link: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            upload_link: upload_link.into(),
        }
    }

    /// `/videos/1123322152` -> `1123322152`
    pub fn video_id(&self) -> &str {
        self.uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

impl TryFrom<CreatedVideo> for RemoteVideoHandle {
    type Error = anyhow::Error;

    fn try_from(value: CreatedVideo) -> Result<Self> {
        let upload_link = value
            .upload_link
            .filter(|link| !link.trim().is_empty())
            .ok_or_else(|| anyhow!("no upload link received from video host"))?;
        let uri = value
            .uri
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| anyhow!("no video uri received from video host"))?;

        Ok(Self { uri, upload_link })
    }
}
