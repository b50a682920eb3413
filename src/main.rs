//! Game Launcher Music Coordinator - harness entry point
//!
//! Runs the coordination engine against the logging sink, driven by
//! line-oriented commands on stdin. Lets the pause/resume behavior be
//! exercised end to end without a launcher front-end attached.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glmc::audio::NullSink;
use glmc::config::{resolve_settings_path, Settings};
use glmc::coordinator::{Coordinator, PresentationMode};

/// Command-line arguments for glmc
#[derive(Parser, Debug)]
#[command(name = "glmc")]
#[command(about = "Game launcher music coordinator")]
#[command(version)]
struct Args {
    /// Settings file path
    #[arg(short, long, env = "GLMC_CONFIG")]
    config: Option<PathBuf>,

    /// Start in fullscreen presentation mode
    #[arg(long)]
    fullscreen: bool,

    /// Override the media poll interval (milliseconds)
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glmc=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let settings_path = resolve_settings_path(args.config.as_deref());
    let mut settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    if let Some(ms) = args.poll_interval_ms {
        settings.media_poll_interval_ms = ms;
    }
    info!("Settings loaded from {}", settings_path.display());

    let mode = if args.fullscreen {
        PresentationMode::Fullscreen
    } else {
        PresentationMode::Desktop
    };

    let coordinator = Arc::new(Coordinator::new(settings, Arc::new(NullSink), mode));
    coordinator.attach();

    let loop_handle = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move { coordinator.run().await })
    };

    // The harness window is considered settled and focused from the start
    coordinator.on_frontend_ready(true).await;

    let stdin_handle = {
        let coordinator = coordinator.clone();
        let settings_path = settings_path.clone();
        tokio::spawn(async move { drive_from_stdin(coordinator, settings_path).await })
    };

    shutdown_signal().await;

    coordinator.shutdown().await;
    let _ = loop_handle.await;
    stdin_handle.abort();

    info!("Shutdown complete");
    Ok(())
}

/// Feed coordinator signals from stdin, one command per line
async fn drive_from_stdin(coordinator: Arc<Coordinator>, settings_path: PathBuf) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(word) => word,
            None => continue,
        };

        match command {
            "focus" => coordinator.on_window_activated().await,
            "blur" => coordinator.on_window_deactivated().await,
            "minimize" => coordinator.on_window_minimized().await,
            "restore" => coordinator.on_window_restored().await,
            "tray" => coordinator.on_window_hidden_to_tray().await,
            "show" => coordinator.on_window_shown_from_tray().await,
            "video-start" => coordinator.on_video_started().await,
            "video-stop" => coordinator.on_video_stopped().await,
            "overlay-on" => coordinator.set_overlay_active(true).await,
            "overlay-off" => coordinator.set_overlay_active(false).await,
            "pause" => coordinator.set_manual_pause(true).await,
            "resume" => coordinator.set_manual_pause(false).await,
            "reset" => coordinator.reset().await,
            "select" => {
                // Explicit UUID or a fresh one per command
                let game_id = parts
                    .next()
                    .and_then(|raw| uuid::Uuid::parse_str(raw).ok())
                    .unwrap_or_else(uuid::Uuid::new_v4);
                coordinator.on_game_selected(game_id).await;
            }
            "reload" => match Settings::load(&settings_path) {
                Ok(settings) => coordinator.replace_settings(settings).await,
                Err(e) => warn!("Settings reload failed: {}", e),
            },
            other => warn!("Unknown command: {}", other),
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
