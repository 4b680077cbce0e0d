use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use mockall::automock;

use crate::domain::{
    entities::remote_videos::{CreatedVideo, RemoteVideoHandle},
    value_objects::{processing_statuses::ProcessingStatus, video_links::VideoVariants},
};

#[automock]
#[async_trait]
pub trait VideoHostingClient {
    /// Short label used in progress messages, e.g. `Vimeo`.
    fn provider_name(&self) -> &'static str;

    async fn create_video(&self, name: &str, size_bytes: u64) -> Result<CreatedVideo>;

    async fn upload_content(&self, handle: &RemoteVideoHandle, content: Bytes) -> Result<()>;

    async fn fetch_status(&self, handle: &RemoteVideoHandle) -> Result<ProcessingStatus>;

    async fn list_variants(&self, handle: &RemoteVideoHandle) -> Result<VideoVariants>;
}
