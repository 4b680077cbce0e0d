use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, header};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::domain::{
    entities::remote_videos::{CreatedVideo, RemoteVideoHandle},
    repositories::video_hosting::VideoHostingClient,
    value_objects::{
        enums::video_statuses::VideoStatus,
        processing_statuses::ProcessingStatus,
        video_links::{VideoVariant, VideoVariants},
    },
};

pub const DEFAULT_VIMEO_API_BASE_URL: &str = "https://api.vimeo.com";
const VIMEO_ACCEPT: &str = "application/vnd.vimeo.*+json;version=3.4";
const TUS_VERSION: &str = "1.0.0";
const TUS_CONTENT_TYPE: &str = "application/offset+octet-stream";

const CREATE_TIMEOUT: Duration = Duration::from_secs(30);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);
const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
const VARIANTS_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_PREVIEW_CHARS: usize = 512;

/// Privacy and player settings applied to every created video.
#[derive(Clone, Debug)]
pub struct VimeoVideoSettings {
    pub privacy_view: String,
    pub privacy_embed: String,
    pub allow_download: bool,
    pub allow_add: bool,
    pub comments: String,
    pub embed_color: String,
    pub show_vimeo_logo: bool,
}

impl Default for VimeoVideoSettings {
    fn default() -> Self {
        Self {
            privacy_view: "unlisted".to_string(),
            privacy_embed: "public".to_string(),
            allow_download: true,
            allow_add: false,
            comments: "nobody".to_string(),
            embed_color: "#1a73e8".to_string(),
            show_vimeo_logo: false,
        }
    }
}

impl VimeoVideoSettings {
    fn privacy(&self) -> Value {
        json!({
            "view": self.privacy_view,
            "embed": self.privacy_embed,
            "download": self.allow_download,
            "add": self.allow_add,
            "comments": self.comments,
        })
    }

    fn embed(&self) -> Value {
        json!({
            "buttons": {
                "embed": false,
                "fullscreen": true,
                "hd": true,
                "like": false,
                "scaling": true,
                "share": false,
                "watchlater": false,
            },
            "color": self.embed_color,
            "logos": { "vimeo": self.show_vimeo_logo },
            "title": {
                "name": "hide",
                "owner": "hide",
                "portrait": "hide",
            },
        })
    }
}

#[derive(Clone)]
pub struct VimeoConfig {
    pub api_base_url: String,
    pub access_token: String,
    pub settings: VimeoVideoSettings,
}

impl Debug for VimeoConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VimeoConfig")
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &"[REDACTED]")
            .field("settings", &self.settings)
            .finish()
    }
}

pub struct VimeoClient {
    http_client: Client,
    api_base_url: String,
    access_token: String,
    settings: VimeoVideoSettings,
}

impl Debug for VimeoClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VimeoClient")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl VimeoClient {
    pub fn new(config: VimeoConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            anyhow::bail!("Vimeo access token is empty");
        }

        let api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        url::Url::parse(&api_base_url).context("invalid Vimeo API base URL")?;

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("failed to create HTTP client for Vimeo")?;

        Ok(Self {
            http_client,
            api_base_url,
            access_token: config.access_token,
            settings: config.settings,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.access_token)
            .header(header::ACCEPT, VIMEO_ACCEPT)
    }

    fn create_body(&self, name: &str, size_bytes: u64) -> Value {
        json!({
            "upload": {
                "approach": "tus",
                "size": size_bytes,
            },
            "name": name,
            "privacy": self.settings.privacy(),
            "embed": self.settings.embed(),
        })
    }
}

#[async_trait]
impl VideoHostingClient for VimeoClient {
    fn provider_name(&self) -> &'static str {
        "Vimeo"
    }

    async fn create_video(&self, name: &str, size_bytes: u64) -> Result<CreatedVideo> {
        let response = self
            .authorized(self.http_client.post(self.api_url("/me/videos")))
            .json(&self.create_body(name, size_bytes))
            .timeout(CREATE_TIMEOUT)
            .send()
            .await
            .map_err(|err| sanitize_reqwest_error(err, "create Vimeo video entry"))?;

        let response = ensure_success(response, "create Vimeo video entry").await?;
        let created: CreateVideoResponse = response
            .json()
            .await
            .context("failed to parse Vimeo create video response")?;

        info!(uri = ?created.uri, "vimeo: video entry created");

        Ok(CreatedVideo {
            uri: created.uri,
            upload_link: created.upload.and_then(|upload| upload.upload_link),
        })
    }

    async fn upload_content(&self, handle: &RemoteVideoHandle, content: Bytes) -> Result<()> {
        let size_bytes = content.len();
        debug!(uri = %handle.uri, size_bytes, "vimeo: sending tus upload");

        // Single offset-zero write; the upload link already authorizes the request.
        let response = self
            .http_client
            .patch(&handle.upload_link)
            .header("Tus-Resumable", TUS_VERSION)
            .header("Upload-Offset", "0")
            .header(header::CONTENT_TYPE, TUS_CONTENT_TYPE)
            .body(content)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|err| sanitize_reqwest_error(err, "upload video to Vimeo"))?;

        ensure_success(response, "upload video to Vimeo").await?;

        info!(uri = %handle.uri, size_bytes, "vimeo: upload completed");
        Ok(())
    }

    async fn fetch_status(&self, handle: &RemoteVideoHandle) -> Result<ProcessingStatus> {
        let response = self
            .authorized(self.http_client.get(self.api_url(&handle.uri)))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|err| sanitize_reqwest_error(err, "poll Vimeo video status"))?;

        let response = ensure_success(response, "poll Vimeo video status").await?;
        let body: VideoStatusResponse = response
            .json()
            .await
            .context("failed to parse Vimeo video status")?;

        Ok(map_status(body))
    }

    async fn list_variants(&self, handle: &RemoteVideoHandle) -> Result<VideoVariants> {
        let response = self
            .authorized(self.http_client.get(self.api_url(&handle.uri)))
            .query(&[("fields", "files,download")])
            .timeout(VARIANTS_TIMEOUT)
            .send()
            .await
            .map_err(|err| sanitize_reqwest_error(err, "retrieve Vimeo video URLs"))?;

        let response = ensure_success(response, "retrieve Vimeo video URLs").await?;
        let body: VariantsResponse = response
            .json()
            .await
            .context("failed to parse Vimeo video files")?;

        let variants = VideoVariants {
            downloads: body
                .download
                .unwrap_or_default()
                .into_iter()
                .map(VideoVariant::from)
                .collect(),
            playback: body
                .files
                .unwrap_or_default()
                .into_iter()
                .map(VideoVariant::from)
                .collect(),
        };

        debug!(
            uri = %handle.uri,
            downloads = variants.downloads.len(),
            playback = variants.playback.len(),
            "vimeo: variants listed"
        );

        Ok(variants)
    }
}

// Vimeo API response types
#[derive(Debug, Deserialize)]
struct CreateVideoResponse {
    uri: Option<String>,
    upload: Option<UploadInfo>,
}

#[derive(Debug, Deserialize)]
struct UploadInfo {
    upload_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoStatusResponse {
    status: Option<String>,
    transcode: Option<TranscodeInfo>,
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TranscodeInfo {
    status: Option<String>,
    progress: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct VariantsResponse {
    download: Option<Vec<VariantDto>>,
    files: Option<Vec<VariantDto>>,
}

#[derive(Debug, Deserialize)]
struct VariantDto {
    quality: Option<String>,
    rendition: Option<String>,
    link: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl From<VariantDto> for VideoVariant {
    fn from(value: VariantDto) -> Self {
        Self {
            quality: value.quality.unwrap_or_default(),
            rendition: value.rendition.unwrap_or_default(),
            link: value.link,
            kind: value.kind,
        }
    }
}

fn map_status(body: VideoStatusResponse) -> ProcessingStatus {
    let transcode = body.transcode.unwrap_or_default();
    let transcode_status = transcode.status.as_deref().unwrap_or_default();

    let status = match (body.status.as_deref().unwrap_or_default(), transcode_status) {
        (_, "error") => VideoStatus::Error,
        ("error" | "upload_error" | "transcoding_error" | "quota_exceeded", _) => {
            VideoStatus::Error
        }
        // An available entry can still be transcoding further renditions.
        (_, "in_progress" | "queued") => VideoStatus::Transcoding,
        ("available", _) => VideoStatus::Available,
        ("transcode_starting" | "transcoding", _) => VideoStatus::Transcoding,
        _ => VideoStatus::Pending,
    };

    let error_message = match body.error {
        Some(Value::String(message)) if !message.trim().is_empty() => Some(message),
        Some(Value::Null) | None => None,
        Some(Value::String(_)) => None,
        Some(other) => Some(other.to_string()),
    };

    ProcessingStatus {
        status,
        transcode_complete: transcode_status == "complete",
        progress_percent: transcode
            .progress
            .map(|progress| progress.clamp(0.0, 100.0).round() as u8),
        error_message,
    }
}

async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .map(|b| b.trim().to_owned())
        .unwrap_or_default();

    let mut detail = format!("failed to {} (status {})", action, status.as_u16());
    if !body.is_empty() {
        // Keep a short preview of the response body for debugging.
        let preview = body.chars().take(BODY_PREVIEW_CHARS).collect::<String>();
        detail.push_str(&format!("; body={}", preview));
    }

    Err(anyhow!(detail))
}

// Upload links carry their own credentials, so the URL is stripped from transport errors.
fn sanitize_reqwest_error(error: reqwest::Error, action: &str) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("failed to {}: request timed out", action);
    }
    if error.is_connect() {
        return anyhow!("failed to {}: connection failed", action);
    }
    anyhow::Error::new(error.without_url()).context(format!("failed to {}", action))
}
