use std::{
    panic::{self, AssertUnwindSafe},
    path::Path,
    sync::Arc,
    time::Duration,
};

use bytes::Bytes;
use thiserror::Error;
use tokio::{fs, time::Instant};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;
use video_upload::domain::{
    entities::remote_videos::RemoteVideoHandle,
    repositories::{progress_observer::ProgressObserver, video_hosting::VideoHostingClient},
    value_objects::{
        enums::video_statuses::VideoStatus,
        processing_statuses::ProcessingStatus,
        upload_requests::UploadRequest,
        video_links::{PublishedVideo, VideoLinks},
        workflow_states::WorkflowState,
    },
};

const UNKNOWN_PROCESSING_ERROR: &str = "Unknown error during processing";

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("remote API error: {0}")]
    RemoteApi(String),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("failed to read video file {path}: {message}")]
    LocalIo { path: String, message: String },
    #[error("processing timeout after {elapsed_secs} seconds")]
    ProcessingTimeout { elapsed_secs: u64 },
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
    #[error("could not resolve video links: {0}")]
    LinkResolution(String),
}

pub type UseCaseResult<T> = std::result::Result<T, WorkflowError>;

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub preferred_quality: String,
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            preferred_quality: "360p".to_string(),
            max_wait: Duration::from_secs(600),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Create entry, upload bytes, wait for transcoding, pick links. Holds no
/// per-run state, so one instance can serve concurrent runs.
pub struct VideoUploadWorkflowUseCase {
    client: Arc<dyn VideoHostingClient + Send + Sync>,
    observer: Option<Arc<dyn ProgressObserver + Send + Sync>>,
    config: WorkflowConfig,
}

impl VideoUploadWorkflowUseCase {
    pub fn new(client: Arc<dyn VideoHostingClient + Send + Sync>, config: WorkflowConfig) -> Self {
        Self {
            client,
            observer: None,
            config,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver + Send + Sync>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub async fn run(&self, request: &UploadRequest) -> UseCaseResult<PublishedVideo> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "video_upload",
            %run_id,
            name = %request.display_name,
            size_bytes = request.size_bytes
        );

        async move {
            info!(path = %request.local_path.display(), "video_upload: starting workflow");

            let mut state = WorkflowState::Created;
            match self.run_steps(request, &mut state).await {
                Ok(published) => {
                    info!(
                        video_id = %published.video_id,
                        "video_upload: workflow complete"
                    );
                    Ok(published)
                }
                Err(err) => {
                    transition(&mut state, WorkflowState::Failed);
                    error!(error = %err, "video_upload: workflow failed");
                    self.report(&format!("{} error: {}", self.client.provider_name(), err));
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_steps(
        &self,
        request: &UploadRequest,
        state: &mut WorkflowState,
    ) -> UseCaseResult<PublishedVideo> {
        let handle = self
            .create_remote_video(&request.display_name, request.size_bytes)
            .await?;
        transition(state, WorkflowState::EntryCreated);

        self.upload_bytes(&handle, &request.local_path, request.size_bytes)
            .await?;
        transition(state, WorkflowState::Uploaded);

        transition(state, WorkflowState::Processing);
        self.await_processing(&handle, self.config.max_wait, self.config.poll_interval)
            .await?;

        let links = self
            .resolve_links(&handle, &self.config.preferred_quality)
            .await?;
        transition(state, WorkflowState::Ready);

        self.report(&format!("{}: Ready for indexing", self.client.provider_name()));

        Ok(PublishedVideo {
            video_id: handle.video_id().to_string(),
            video_uri: handle.uri.clone(),
            links,
        })
    }

    pub async fn create_remote_video(
        &self,
        name: &str,
        size_bytes: u64,
    ) -> UseCaseResult<RemoteVideoHandle> {
        let provider = self.client.provider_name();
        self.report(&format!("{}: Creating video entry...", provider));

        let created = self
            .client
            .create_video(name, size_bytes)
            .await
            .map_err(|err| WorkflowError::RemoteApi(format!("{err:#}")))?;

        let handle = RemoteVideoHandle::try_from(created)
            .map_err(|err| WorkflowError::RemoteApi(err.to_string()))?;

        info!(video_uri = %handle.uri, "video_upload: video entry created");
        self.report(&format!("{}: Video entry created", provider));

        Ok(handle)
    }

    /// Reads the whole file before touching the network, so an unreadable file
    /// never reaches the upload target.
    pub async fn upload_bytes(
        &self,
        handle: &RemoteVideoHandle,
        file_path: &Path,
        size_bytes: u64,
    ) -> UseCaseResult<()> {
        let provider = self.client.provider_name();
        self.report(&format!("{}: Starting upload...", provider));

        let content = fs::read(file_path)
            .await
            .map_err(|err| WorkflowError::LocalIo {
                path: file_path.display().to_string(),
                message: err.to_string(),
            })?;

        let read_bytes = content.len() as u64;
        if read_bytes != size_bytes {
            warn!(
                video_uri = %handle.uri,
                declared_bytes = size_bytes,
                read_bytes,
                "video_upload: file size differs from declared size"
            );
        }

        self.client
            .upload_content(handle, Bytes::from(content))
            .await
            .map_err(|err| WorkflowError::Upload(format!("{err:#}")))?;

        info!(video_uri = %handle.uri, size_bytes = read_bytes, "video_upload: upload completed");
        self.report(&format!("{}: Upload complete, processing...", provider));

        Ok(())
    }

    /// Polls until ready, failed or past `max_wait`. Fetch errors are treated
    /// as transient and only end the loop through the deadline.
    pub async fn await_processing(
        &self,
        handle: &RemoteVideoHandle,
        max_wait: Duration,
        poll_interval: Duration,
    ) -> UseCaseResult<ProcessingStatus> {
        let provider = self.client.provider_name();
        let started = Instant::now();
        let mut poll: u32 = 0;

        loop {
            poll += 1;
            let elapsed = started.elapsed();
            if elapsed > max_wait {
                error!(
                    video_uri = %handle.uri,
                    elapsed_secs = elapsed.as_secs(),
                    "video_upload: processing timeout"
                );
                return Err(WorkflowError::ProcessingTimeout {
                    elapsed_secs: elapsed.as_secs(),
                });
            }

            match self.client.fetch_status(handle).await {
                Ok(status) if status.is_ready() => {
                    info!(video_uri = %handle.uri, poll, "video_upload: processing complete");
                    self.report(&format!("{}: Processing complete", provider));
                    return Ok(status);
                }
                Ok(status) if status.is_failed() => {
                    let message = status
                        .error_message
                        .unwrap_or_else(|| UNKNOWN_PROCESSING_ERROR.to_string());
                    error!(
                        video_uri = %handle.uri,
                        poll,
                        error = %message,
                        "video_upload: processing failed"
                    );
                    return Err(WorkflowError::ProcessingFailed(message));
                }
                Ok(status) => {
                    if status.status == VideoStatus::Transcoding {
                        self.report(&format!(
                            "{}: Processing {}%...",
                            provider,
                            status.progress_percent.unwrap_or(0)
                        ));
                    }
                    debug!(
                        video_uri = %handle.uri,
                        poll,
                        status = %status.status,
                        progress = ?status.progress_percent,
                        "video_upload: still processing"
                    );
                }
                Err(err) => {
                    warn!(
                        video_uri = %handle.uri,
                        poll,
                        error = %format!("{err:#}"),
                        "video_upload: status poll failed; retrying"
                    );
                }
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    pub async fn resolve_links(
        &self,
        handle: &RemoteVideoHandle,
        preferred_quality: &str,
    ) -> UseCaseResult<VideoLinks> {
        let variants = self
            .client
            .list_variants(handle)
            .await
            .map_err(|err| WorkflowError::RemoteApi(format!("{err:#}")))?;

        debug!(
            video_uri = %handle.uri,
            downloads = variants.downloads.len(),
            playback = variants.playback.len(),
            playback_kinds = ?variants
                .playback
                .iter()
                .filter_map(|variant| variant.kind.as_deref())
                .collect::<Vec<_>>(),
            preferred_quality,
            "video_upload: variants fetched"
        );

        if variants.is_empty() {
            return Err(WorkflowError::LinkResolution(
                "host returned no download or playback variants".to_string(),
            ));
        }

        let download_url = variants.select_download(preferred_quality);
        let playback_url = variants.select_playback(preferred_quality);

        if download_url.is_none() != playback_url.is_none() {
            // Kept for compatibility: one URL ends up serving both purposes.
            warn!(
                video_uri = %handle.uri,
                download_found = download_url.is_some(),
                playback_found = playback_url.is_some(),
                "video_upload: only one link resolved; reusing it for both"
            );
        }

        VideoLinks::from_partial(download_url, playback_url).ok_or_else(|| {
            WorkflowError::LinkResolution(format!(
                "no usable link among {} download and {} playback variants",
                variants.downloads.len(),
                variants.playback.len()
            ))
        })
    }

    fn report(&self, message: &str) {
        let Some(observer) = self.observer.as_ref() else {
            return;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| observer.notify(message))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                warn!(error = %err, "video_upload: progress observer failed; continuing");
            }
            Err(_) => {
                warn!("video_upload: progress observer panicked; continuing");
            }
        }
    }
}

fn transition(state: &mut WorkflowState, to: WorkflowState) {
    match state.advance(to) {
        Ok(next) => {
            debug!(from = %state, to = %next, "video_upload: state transition");
            *state = next;
        }
        Err(err) => {
            warn!(error = %err, "video_upload: ignoring invalid state transition");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use std::{path::PathBuf, sync::Mutex};
    use tempfile::TempDir;
    use video_upload::domain::{
        entities::remote_videos::CreatedVideo,
        repositories::video_hosting::MockVideoHostingClient,
        value_objects::video_links::{VideoVariant, VideoVariants},
    };

    #[derive(Default)]
    struct RecordingObserver {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl ProgressObserver for RecordingObserver {
        fn notify(&self, message: &str) -> anyhow::Result<()> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    struct FailingObserver;

    impl ProgressObserver for FailingObserver {
        fn notify(&self, _message: &str) -> anyhow::Result<()> {
            Err(anyhow!("observer unavailable"))
        }
    }

    struct PanickingObserver;

    impl ProgressObserver for PanickingObserver {
        fn notify(&self, _message: &str) -> anyhow::Result<()> {
            panic!("observer exploded");
        }
    }

    fn video_file(contents: &[u8]) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("demo.mp4");
        std::fs::write(&path, contents).expect("write video");
        (dir, path)
    }

    fn handle() -> RemoteVideoHandle {
        RemoteVideoHandle::new("/videos/42", "https://files.example/upload/42")
    }

    fn variant(quality: &str, link: &str) -> VideoVariant {
        VideoVariant {
            quality: quality.to_string(),
            rendition: quality.to_string(),
            link: Some(link.to_string()),
            kind: None,
        }
    }

    fn status(status: VideoStatus, complete: bool, progress: Option<u8>) -> ProcessingStatus {
        ProcessingStatus {
            status,
            transcode_complete: complete,
            progress_percent: progress,
            error_message: None,
        }
    }

    fn base_client() -> MockVideoHostingClient {
        let mut client = MockVideoHostingClient::new();
        client.expect_provider_name().return_const("Vimeo");
        client
    }

    fn fast_config() -> WorkflowConfig {
        WorkflowConfig {
            preferred_quality: "360p".to_string(),
            max_wait: Duration::from_secs(60),
            poll_interval: Duration::from_secs(5),
        }
    }

    fn usecase(client: MockVideoHostingClient) -> VideoUploadWorkflowUseCase {
        VideoUploadWorkflowUseCase::new(Arc::new(client), fast_config())
    }

    #[tokio::test(start_paused = true)]
    async fn run_happy_path_reports_every_phase() {
        let (_dir, path) = video_file(b"hello video");
        let mut client = base_client();
        client
            .expect_create_video()
            .with(eq("demo.mp4"), eq(11u64))
            .times(1)
            .returning(|_, _| {
                Ok(CreatedVideo {
                    uri: Some("/videos/42".to_string()),
                    upload_link: Some("https://files.example/upload/42".to_string()),
                })
            });
        client
            .expect_upload_content()
            .withf(|handle, content| {
                handle.upload_link == "https://files.example/upload/42"
                    && content.as_ref() == b"hello video"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut polls = vec![
            status(VideoStatus::Available, true, Some(100)),
            status(VideoStatus::Transcoding, false, Some(50)),
            status(VideoStatus::Pending, false, None),
        ];
        client
            .expect_fetch_status()
            .times(3)
            .returning(move |_| Ok(polls.pop().expect("poll sequence")));
        client.expect_list_variants().times(1).returning(|_| {
            Ok(VideoVariants {
                downloads: vec![
                    variant("1080p", "https://cdn/dl-1080"),
                    variant("360p", "https://cdn/dl-360"),
                ],
                playback: vec![
                    variant("1080p", "https://cdn/play-1080"),
                    variant("360p", "https://cdn/play-360"),
                ],
            })
        });

        let observer = Arc::new(RecordingObserver::default());
        let workflow = usecase(client).with_observer(observer.clone());
        let request = UploadRequest::new(&path, "demo.mp4", 11);

        let published = workflow.run(&request).await.expect("workflow succeeds");

        assert_eq!(published.video_id, "42");
        assert_eq!(published.video_uri, "/videos/42");
        assert_eq!(published.links.download_url, "https://cdn/dl-360");
        assert_eq!(published.links.playback_url, "https://cdn/play-360");
        assert_eq!(
            observer.messages(),
            vec![
                "Vimeo: Creating video entry...",
                "Vimeo: Video entry created",
                "Vimeo: Starting upload...",
                "Vimeo: Upload complete, processing...",
                "Vimeo: Processing 50%...",
                "Vimeo: Processing complete",
                "Vimeo: Ready for indexing",
            ]
        );
    }

    #[tokio::test]
    async fn missing_upload_link_is_remote_api_error() {
        let (_dir, path) = video_file(b"abc");
        let mut client = base_client();
        client.expect_create_video().times(1).returning(|_, _| {
            Ok(CreatedVideo {
                uri: Some("/videos/42".to_string()),
                upload_link: None,
            })
        });
        client.expect_upload_content().never();

        let observer = Arc::new(RecordingObserver::default());
        let workflow = usecase(client).with_observer(observer.clone());

        let err = workflow
            .run(&UploadRequest::new(&path, "demo.mp4", 3))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::RemoteApi(_)));
        let last = observer.messages().pop().unwrap();
        assert!(last.starts_with("Vimeo error: remote API error"));
    }

    #[tokio::test]
    async fn create_failure_is_remote_api_error() {
        let mut client = base_client();
        client
            .expect_create_video()
            .returning(|_, _| Err(anyhow!("failed to create Vimeo video entry (status 401)")));

        let err = usecase(client)
            .create_remote_video("demo.mp4", 3)
            .await
            .unwrap_err();

        match err {
            WorkflowError::RemoteApi(message) => assert!(message.contains("status 401")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_of_missing_file_never_contacts_remote() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.mp4");
        let mut client = base_client();
        client.expect_upload_content().never();

        let err = usecase(client)
            .upload_bytes(&handle(), &missing, 10)
            .await
            .unwrap_err();

        match err {
            WorkflowError::LocalIo { path, .. } => assert!(path.ends_with("nope.mp4")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_transfer_is_upload_error() {
        let (_dir, path) = video_file(b"abc");
        let mut client = base_client();
        client
            .expect_upload_content()
            .times(1)
            .returning(|_, _| Err(anyhow!("failed to upload video to Vimeo (status 500)")));

        let err = usecase(client)
            .upload_bytes(&handle(), &path, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Upload(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn polling_times_out_despite_transient_errors() {
        let mut client = base_client();
        let mut calls = 0u32;
        client.expect_fetch_status().returning(move |_| {
            calls += 1;
            if calls % 2 == 0 {
                Err(anyhow!("poll Vimeo video status: connection failed"))
            } else {
                Ok(status(VideoStatus::Transcoding, false, Some(10)))
            }
        });

        let err = usecase(client)
            .await_processing(&handle(), Duration::from_secs(60), Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            WorkflowError::ProcessingTimeout { elapsed_secs } => assert!(elapsed_secs >= 60),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polling_times_out_when_every_poll_fails() {
        let mut client = base_client();
        client
            .expect_fetch_status()
            .returning(|_| Err(anyhow!("request timed out")));

        let err = usecase(client)
            .await_processing(&handle(), Duration::from_secs(30), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::ProcessingTimeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried_until_ready() {
        let mut client = base_client();
        let mut calls = 0u32;
        client.expect_fetch_status().times(3).returning(move |_| {
            calls += 1;
            match calls {
                1 | 2 => Err(anyhow!("connection reset")),
                _ => Ok(status(VideoStatus::Available, true, None)),
            }
        });

        let ready = usecase(client)
            .await_processing(&handle(), Duration::from_secs(60), Duration::from_secs(5))
            .await
            .expect("ready after retries");

        assert!(ready.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn available_but_incomplete_transcode_keeps_polling() {
        let mut client = base_client();
        let mut polls = vec![
            status(VideoStatus::Available, true, None),
            status(VideoStatus::Available, false, Some(99)),
        ];
        client
            .expect_fetch_status()
            .times(2)
            .returning(move |_| Ok(polls.pop().expect("poll sequence")));

        let ready = usecase(client)
            .await_processing(&handle(), Duration::from_secs(60), Duration::from_secs(5))
            .await
            .expect("ready");

        assert!(ready.transcode_complete);
    }

    #[tokio::test]
    async fn remote_error_state_is_processing_failed() {
        let mut client = base_client();
        client.expect_fetch_status().times(1).returning(|_| {
            Ok(ProcessingStatus {
                status: VideoStatus::Error,
                transcode_complete: false,
                progress_percent: None,
                error_message: Some("unsupported codec".to_string()),
            })
        });

        let err = usecase(client)
            .await_processing(&handle(), Duration::from_secs(60), Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            WorkflowError::ProcessingFailed(message) => assert_eq!(message, "unsupported codec"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn remote_error_without_message_uses_default() {
        let mut client = base_client();
        client
            .expect_fetch_status()
            .returning(|_| Ok(status(VideoStatus::Error, false, None)));

        let err = usecase(client)
            .await_processing(&handle(), Duration::from_secs(60), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("processing failed: {}", UNKNOWN_PROCESSING_ERROR)
        );
    }

    #[tokio::test]
    async fn resolve_links_prefers_requested_quality() {
        let mut client = base_client();
        client.expect_list_variants().returning(|_| {
            Ok(VideoVariants {
                downloads: vec![
                    variant("1080p", "https://cdn/dl-1080"),
                    variant("360p", "https://cdn/dl-360"),
                ],
                playback: vec![],
            })
        });

        let links = usecase(client)
            .resolve_links(&handle(), "360p")
            .await
            .expect("links");

        assert_eq!(links.download_url, "https://cdn/dl-360");
        assert_eq!(links.playback_url, "https://cdn/dl-360");
    }

    #[tokio::test]
    async fn resolve_links_reuses_playback_for_download() {
        let mut client = base_client();
        client.expect_list_variants().returning(|_| {
            Ok(VideoVariants {
                downloads: vec![],
                playback: vec![
                    variant("720p", "https://cdn/play-720"),
                    variant("360p", "https://cdn/play-360"),
                ],
            })
        });

        let links = usecase(client)
            .resolve_links(&handle(), "360p")
            .await
            .expect("links");

        assert_eq!(links.playback_url, "https://cdn/play-360");
        assert_eq!(links.download_url, links.playback_url);
    }

    #[tokio::test]
    async fn resolve_links_without_variants_fails() {
        let mut client = base_client();
        client
            .expect_list_variants()
            .returning(|_| Ok(VideoVariants::default()));

        let err = usecase(client)
            .resolve_links(&handle(), "360p")
            .await
            .unwrap_err();

        match err {
            WorkflowError::LinkResolution(message) => {
                assert!(message.contains("no download or playback variants"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolve_links_with_only_linkless_variants_fails() {
        let mut client = base_client();
        client.expect_list_variants().returning(|_| {
            Ok(VideoVariants {
                downloads: vec![VideoVariant {
                    quality: "360p".to_string(),
                    rendition: "360p".to_string(),
                    link: None,
                    kind: Some("video/mp4".to_string()),
                }],
                playback: vec![],
            })
        });

        let err = usecase(client)
            .resolve_links(&handle(), "360p")
            .await
            .unwrap_err();

        match err {
            WorkflowError::LinkResolution(message) => {
                assert!(message.contains("no usable link"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolve_links_listing_failure_is_remote_api_error() {
        let mut client = base_client();
        client
            .expect_list_variants()
            .returning(|_| Err(anyhow!("failed to retrieve Vimeo video URLs (status 404)")));

        let err = usecase(client)
            .resolve_links(&handle(), "360p")
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::RemoteApi(_)));
    }

    fn succeeding_client() -> MockVideoHostingClient {
        let mut client = base_client();
        client.expect_create_video().returning(|_, _| {
            Ok(CreatedVideo {
                uri: Some("/videos/9".to_string()),
                upload_link: Some("https://files.example/upload/9".to_string()),
            })
        });
        client.expect_upload_content().returning(|_, _| Ok(()));
        client
            .expect_fetch_status()
            .returning(|_| Ok(status(VideoStatus::Available, true, Some(100))));
        client.expect_list_variants().returning(|_| {
            Ok(VideoVariants {
                downloads: vec![variant("360p", "https://cdn/dl")],
                playback: vec![variant("360p", "https://cdn/play")],
            })
        });
        client
    }

    #[tokio::test]
    async fn failing_observer_does_not_abort_workflow() {
        let (_dir, path) = video_file(b"abc");
        let workflow = usecase(succeeding_client()).with_observer(Arc::new(FailingObserver));

        let published = workflow
            .run(&UploadRequest::new(&path, "demo.mp4", 3))
            .await
            .expect("observer failures are ignored");

        assert_eq!(published.video_id, "9");
    }

    #[tokio::test]
    async fn panicking_observer_does_not_abort_workflow() {
        let (_dir, path) = video_file(b"abc");
        let workflow = usecase(succeeding_client()).with_observer(Arc::new(PanickingObserver));

        let published = workflow
            .run(&UploadRequest::new(&path, "demo.mp4", 3))
            .await
            .expect("observer panics are contained");

        assert!(!published.links.download_url.is_empty());
        assert!(!published.links.playback_url.is_empty());
    }

    #[tokio::test]
    async fn run_without_observer_surfaces_step_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.mp4");
        let mut client = base_client();
        client.expect_create_video().returning(|_, _| {
            Ok(CreatedVideo {
                uri: Some("/videos/9".to_string()),
                upload_link: Some("https://files.example/upload/9".to_string()),
            })
        });
        client.expect_upload_content().never();
        client.expect_fetch_status().never();

        let err = usecase(client)
            .run(&UploadRequest::new(&missing, "gone.mp4", 3))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::LocalIo { .. }));
    }
}
