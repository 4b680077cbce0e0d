use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info, warn};
use uploader::{
    config,
    usecases::video_upload_workflow::{VideoUploadWorkflowUseCase, WorkflowConfig},
};
use video_upload::{
    domain::{
        repositories::{progress_observer::ProgressObserver, video_hosting::VideoHostingClient},
        value_objects::upload_requests::UploadRequest,
    },
    infra::{
        notifiers::{
            composite::CompositeProgressObserver,
            discord::{DiscordProgressConfig, DiscordProgressObserver},
            log::LogProgressObserver,
        },
        video_hosting::vimeo::VimeoClient,
    },
};

const PROGRESS_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "uploader")]
#[command(about = "Upload a local video to Vimeo and print its playback and download links")]
struct Args {
    /// Path to the video file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Display name for the remote video (defaults to the file name)
    #[arg(long)]
    name: Option<String>,

    /// Preferred rendition, e.g. 360p (overrides VIMEO_PREFERRED_QUALITY)
    #[arg(long)]
    quality: Option<String>,

    /// Processing deadline in seconds (overrides VIMEO_MAX_WAIT_SECS)
    #[arg(long)]
    max_wait_secs: Option<u64>,

    /// Seconds between status polls (overrides VIMEO_POLL_INTERVAL_SECS)
    #[arg(long)]
    poll_interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(error) = run(args).await {
        error!("Uploader exited with error: {:#}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    dotenvy::dotenv().ok();
    let service = video_upload::observability::init_observability("uploader")?;

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    if !dotenvy_env.vimeo.enabled {
        bail!("Vimeo upload is disabled; set VIMEO_ENABLE_UPLOAD=true to enable it");
    }

    let client: Arc<dyn VideoHostingClient + Send + Sync> =
        Arc::new(VimeoClient::new(dotenvy_env.vimeo.client.clone())?);

    let mut observers = CompositeProgressObserver::default();
    observers.push(Arc::new(LogProgressObserver::new("uploader")));
    let discord = match dotenvy_env.progress.discord_webhook_url.clone() {
        Some(webhook_url) => {
            let discord = Arc::new(DiscordProgressObserver::new(DiscordProgressConfig {
                webhook_url,
                service_name: service.service_name.clone(),
                environment: service.environment.clone(),
            })?);
            observers.push(discord.clone());
            info!("Discord progress notifications enabled");
            Some(discord)
        }
        None => None,
    };
    let observer: Arc<dyn ProgressObserver + Send + Sync> = Arc::new(observers);

    let mut workflow_config = WorkflowConfig {
        preferred_quality: dotenvy_env.workflow.preferred_quality.clone(),
        max_wait: dotenvy_env.workflow.max_wait,
        poll_interval: dotenvy_env.workflow.poll_interval,
    };
    if let Some(quality) = args.quality {
        workflow_config.preferred_quality = quality;
    }
    if let Some(secs) = args.max_wait_secs {
        workflow_config.max_wait = Duration::from_secs(secs);
    }
    if let Some(secs) = args.poll_interval_secs {
        if secs == 0 {
            bail!("--poll-interval-secs must be greater than zero");
        }
        workflow_config.poll_interval = Duration::from_secs(secs);
    }

    let request = UploadRequest::from_path(&args.file, args.name).await?;

    let usecase = VideoUploadWorkflowUseCase::new(client, workflow_config).with_observer(observer);
    let outcome = usecase.run(&request).await;

    // The final outcome is only queued; drain it before the runtime stops.
    if let Some(discord) = discord {
        if let Err(error) = discord.shutdown(PROGRESS_FLUSH_TIMEOUT).await {
            warn!(error = %error, "Discord progress notifications not fully delivered");
        }
    }

    let published = outcome?;

    let output =
        serde_json::to_string_pretty(&published).context("failed to serialize upload result")?;
    println!("{output}");

    Ok(())
}
