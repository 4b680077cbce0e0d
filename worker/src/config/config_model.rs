use std::time::Duration;

use url::Url;
use video_upload::infra::video_hosting::vimeo::VimeoConfig;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub vimeo: VimeoUpload,
    pub workflow: Workflow,
    pub progress: Progress,
}

/// Capability flag plus the client settings. The access token may be empty
/// only when the capability is disabled.
#[derive(Debug, Clone)]
pub struct VimeoUpload {
    pub enabled: bool,
    pub client: VimeoConfig,
}

#[derive(Debug, Clone)]
pub struct Workflow {
    pub preferred_quality: String,
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

#[derive(Clone, Default)]
pub struct Progress {
    pub discord_webhook_url: Option<Url>,
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Webhook URLs contain secrets.
        f.debug_struct("Progress")
            .field(
                "discord_webhook_url",
                &self.discord_webhook_url.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
