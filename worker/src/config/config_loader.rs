use std::time::Duration;

use super::config_model::{DotEnvyConfig, Progress, VimeoUpload, Workflow};
use anyhow::{Context, Result, bail};
use url::Url;
use video_upload::infra::video_hosting::vimeo::{
    DEFAULT_VIMEO_API_BASE_URL, VimeoConfig, VimeoVideoSettings,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let enabled = match var("VIMEO_ENABLE_UPLOAD") {
        Some(raw) => parse_bool(&raw).context("VIMEO_ENABLE_UPLOAD is invalid")?,
        None => false,
    };

    let access_token = var("VIMEO_ACCESS_TOKEN").unwrap_or_default();
    if enabled && access_token.is_empty() {
        bail!("VIMEO_ACCESS_TOKEN is required when VIMEO_ENABLE_UPLOAD is true");
    }

    let api_base_url =
        var("VIMEO_API_BASE_URL").unwrap_or_else(|| DEFAULT_VIMEO_API_BASE_URL.to_string());
    Url::parse(&api_base_url).context("VIMEO_API_BASE_URL is invalid")?;

    let mut settings = VimeoVideoSettings::default();
    if let Some(color) = var("VIMEO_EMBED_COLOR") {
        settings.embed_color = color;
    }

    let vimeo = VimeoUpload {
        enabled,
        client: VimeoConfig {
            api_base_url,
            access_token,
            settings,
        },
    };

    let max_wait_secs: u64 = var("VIMEO_MAX_WAIT_SECS")
        .unwrap_or_else(|| "600".to_string())
        .parse()
        .context("VIMEO_MAX_WAIT_SECS is invalid")?;
    let poll_interval_secs: u64 = var("VIMEO_POLL_INTERVAL_SECS")
        .unwrap_or_else(|| "5".to_string())
        .parse()
        .context("VIMEO_POLL_INTERVAL_SECS is invalid")?;
    if poll_interval_secs == 0 {
        bail!("VIMEO_POLL_INTERVAL_SECS must be greater than zero");
    }

    let workflow = Workflow {
        preferred_quality: var("VIMEO_PREFERRED_QUALITY").unwrap_or_else(|| "360p".to_string()),
        max_wait: Duration::from_secs(max_wait_secs),
        poll_interval: Duration::from_secs(poll_interval_secs),
    };

    let progress = Progress {
        discord_webhook_url: var("PROGRESS_DISCORD_WEBHOOK_URL")
            .map(|raw| Url::parse(&raw))
            .transpose()
            // Do not echo the raw value; webhook URLs contain secrets.
            .context("PROGRESS_DISCORD_WEBHOOK_URL is invalid")?,
    };

    Ok(DotEnvyConfig {
        vimeo,
        workflow,
        progress,
    })
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => bail!("expected a boolean, got {raw}"),
    }
}
