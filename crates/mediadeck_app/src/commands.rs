use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use mediadeck_core::JobId;
use mediadeck_engine::{ChannelEventSink, ClientConfig, ClientSession, PollKind, SessionEvent};
use mediadeck_logging::{deck_info, deck_warn};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::cli::{Cli, CliCommand};
use crate::config::{load_config_file, resolve_config, BASE_URL_ENV};
use crate::render::{describe_event, render_ack, render_media, render_queue};

/// Build the client configuration for this invocation.
pub fn client_config(cli: &Cli) -> ClientConfig {
    let file = load_config_file(cli.config.as_deref().map(Path::new));
    resolve_config(
        &file,
        std::env::var(BASE_URL_ENV).ok(),
        cli.base_url.clone(),
    )
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(destination) = cli.log.destination() {
        mediadeck_logging::initialize(destination, cli.log_level());
    }
    let config = client_config(&cli);
    deck_info!("Using backend {}", config.base_url);

    let (tx, mut events) = mpsc::unbounded_channel();
    let session = ClientSession::connect(&config, Arc::new(ChannelEventSink::new(tx)))
        .with_context(|| format!("cannot connect to {}", config.base_url))?;

    let result = execute(cli.command, &session, &mut events, &config).await;
    session.shutdown().await;
    result
}

async fn execute(
    command: CliCommand,
    session: &ClientSession,
    events: &mut UnboundedReceiver<SessionEvent>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    let load_timeout = config.request_timeout + Duration::from_secs(1);
    match command {
        CliCommand::Watch => watch(session, events).await?,
        CliCommand::Status => {
            wait_for_first_snapshot(events, load_timeout).await?;
            print!("{}", render_queue(&session.view()));
        }
        CliCommand::Analyze { url } => {
            let info = session.dispatcher().analyze(&url).await?;
            print!("{}", render_media(&info));
        }
        CliCommand::Add { url, quality } => {
            let ack = session.dispatcher().add_download(&url, &quality).await?;
            println!("{}", render_ack(&ack, "Added to download queue"));
        }
        CliCommand::Pause { id } => {
            wait_for_first_snapshot(events, load_timeout).await?;
            let ack = session.dispatcher().pause(&JobId::new(id)).await?;
            println!("{}", render_ack(&ack, "Download paused"));
        }
        CliCommand::Resume { id } => {
            wait_for_first_snapshot(events, load_timeout).await?;
            let ack = session.dispatcher().resume(&JobId::new(id)).await?;
            println!("{}", render_ack(&ack, "Download resumed"));
        }
        CliCommand::Cancel { id } => {
            wait_for_first_snapshot(events, load_timeout).await?;
            let ack = session.dispatcher().cancel(&JobId::new(id)).await?;
            println!("{}", render_ack(&ack, "Download cancelled"));
        }
        CliCommand::ClearCompleted => {
            wait_for_first_snapshot(events, load_timeout).await?;
            let ack = session.dispatcher().clear_completed().await?;
            println!("{}", render_ack(&ack, "Completed downloads cleared"));
        }
    }
    Ok(())
}

/// Job commands need the queue loaded so unknown ids are caught locally.
async fn wait_for_first_snapshot(
    events: &mut UnboundedReceiver<SessionEvent>,
    timeout: Duration,
) -> anyhow::Result<()> {
    let wait = async {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::SnapshotApplied { .. } => return Ok(()),
                SessionEvent::PollFailed {
                    kind: PollKind::FullRefresh,
                    reason,
                    ..
                } => bail!("could not load the download queue: {reason}"),
                _ => {}
            }
        }
        bail!("session stopped before the queue was loaded")
    };
    tokio::time::timeout(timeout, wait)
        .await
        .context("timed out loading the download queue")?
}

async fn watch(
    session: &ClientSession,
    events: &mut UnboundedReceiver<SessionEvent>,
) -> anyhow::Result<()> {
    let mut redraw = tokio::time::interval(Duration::from_secs(1));
    let mut last_frame = String::new();
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    deck_warn!("Ctrl-C handler failed: {}", err);
                }
                break;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Some(notice) = describe_event(&event) {
                    println!("{} {}", chrono::Local::now().format("%H:%M:%S"), notice);
                }
            }
            _ = redraw.tick() => {
                let frame = render_queue(&session.view());
                if frame != last_frame {
                    println!(
                        "--- {} ---\n{}",
                        chrono::Local::now().format("%H:%M:%S"),
                        frame
                    );
                    last_frame = frame;
                }
            }
        }
    }
    Ok(())
}
