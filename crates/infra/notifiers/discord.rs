use std::{sync::Mutex, time::Duration};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::json;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;
use url::Url;

use crate::domain::repositories::progress_observer::ProgressObserver;

const QUEUE_CAPACITY: usize = 256;
const DISCORD_CONTENT_LIMIT: usize = 2000;

#[derive(Clone)]
pub struct DiscordProgressConfig {
    pub webhook_url: Url,
    pub service_name: String,
    pub environment: String,
}

#[derive(Clone, Debug)]
struct ProgressEvent {
    timestamp: DateTime<Utc>,
    message: String,
}

/// Forwards progress messages to a Discord webhook. `notify` only enqueues;
/// delivery happens on a background task so a slow or failing webhook never
/// blocks the caller. Call `shutdown` before the runtime goes away, or
/// queued messages are lost.
pub struct DiscordProgressObserver {
    tx: Mutex<Option<mpsc::Sender<ProgressEvent>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DiscordProgressObserver {
    /// Must be called from within a tokio runtime.
    pub fn new(config: DiscordProgressConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .context("failed to create HTTP client for Discord progress webhook")?;

        let (tx, mut rx) = mpsc::channel::<ProgressEvent>(QUEUE_CAPACITY);

        let worker = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let content = format_content(&config.service_name, &config.environment, &event);
                if let Err(error) = send(&client, &config.webhook_url, content).await {
                    warn!(
                        provider = "discord",
                        error = %error,
                        "Progress notification failed"
                    );
                }
            }
        });

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Stops accepting messages and waits up to `timeout` for the queue to
    /// drain. Later calls are no-ops.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        drop(
            self.tx
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take(),
        );
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let Some(worker) = worker else {
            return Ok(());
        };

        match tokio::time::timeout(timeout, worker).await {
            Ok(joined) => joined.context("discord progress worker failed"),
            Err(_) => Err(anyhow!(
                "discord progress queue not drained within {}s",
                timeout.as_secs()
            )),
        }
    }
}

impl ProgressObserver for DiscordProgressObserver {
    fn notify(&self, message: &str) -> Result<()> {
        let event = ProgressEvent {
            timestamp: Utc::now(),
            message: message.to_string(),
        };

        let guard = self
            .tx
            .lock()
            .map_err(|_| anyhow!("progress queue lock poisoned; dropping message"))?;
        let Some(tx) = guard.as_ref() else {
            return Err(anyhow!("progress queue shut down; dropping message"));
        };

        match tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                Err(anyhow!("progress queue full; dropping message"))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(anyhow!("progress queue closed; dropping message"))
            }
        }
    }
}

async fn send(client: &Client, webhook_url: &Url, content: String) -> Result<()> {
    let response = client
        .post(webhook_url.clone())
        .json(&json!({ "content": content }))
        .send()
        .await
        .map_err(sanitize_reqwest_error)?;

    if response.status().is_success() {
        return Ok(());
    }

    Err(anyhow!(
        "discord webhook returned non-success status: {}",
        response.status()
    ))
}

fn format_content(service_name: &str, environment: &str, event: &ProgressEvent) -> String {
    let content = format!(
        "**{}** `{}` `{}`\n> {}",
        service_name,
        environment,
        event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        event.message.trim()
    );

    truncate_for_discord(content)
}

fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("discord webhook request timed out");
    }
    if error.is_connect() {
        return anyhow!("discord webhook connection failed");
    }
    anyhow!("discord webhook request failed")
}

fn truncate_for_discord(content: String) -> String {
    const SUFFIX: &str = "\n… (truncated)";

    if content.chars().count() <= DISCORD_CONTENT_LIMIT {
        return content;
    }

    let allowed = DISCORD_CONTENT_LIMIT.saturating_sub(SUFFIX.chars().count());
    let mut truncated: String = content.chars().take(allowed).collect();
    truncated.push_str(SUFFIX);
    truncated
}
