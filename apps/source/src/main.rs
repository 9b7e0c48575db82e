//! Relaycast Source - headless Icecast source client.
//!
//! Streams every playable file in a directory, in order or shuffled, to an
//! Icecast mount point as one continuous MP3 stream. Intended to run as a
//! background daemon; the exit status tells the service manager why it stopped.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use relaycast_core::{
    exit_status, FfmpegTranscoder, IcecastAdminClient, LoggingEventEmitter, MediaInfoReader,
    RelaycastError, RunOutcome, Supervisor, TcpConnector,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::config::SourceConfig;

/// Relaycast Source - Stream a music directory to an Icecast server.
#[derive(Parser, Debug)]
#[command(name = "relaycast-source")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "RELAYCAST_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Media directory (overrides config file).
    #[arg(short, long, env = "RELAYCAST_LIBRARY_DIR")]
    directory: Option<PathBuf>,

    /// Icecast host (overrides config file).
    #[arg(short = 'H', long, env = "RELAYCAST_ICECAST_HOST")]
    host: Option<String>,

    /// Icecast port (overrides config file).
    #[arg(short, long, env = "RELAYCAST_ICECAST_PORT")]
    port: Option<u16>,

    /// Restart from the first track after the last one.
    #[arg(long = "loop")]
    looping: bool,

    /// Shuffle the queue once before streaming.
    #[arg(short, long)]
    shuffle: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Relaycast Source v{}", env!("CARGO_PKG_VERSION"));

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            let code = e
                .downcast_ref::<RelaycastError>()
                .map(RelaycastError::exit_code)
                .unwrap_or(exit_status::CONFIGURATION);
            ExitCode::from(code)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config =
        SourceConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(directory) = args.directory {
        config.set_directory(directory);
    }
    if let Some(host) = args.host {
        config.run.icecast.host = host;
    }
    if let Some(port) = args.port {
        config.run.icecast.port = port;
    }
    if args.looping {
        config.run.library.looping = true;
    }
    if args.shuffle {
        config.run.library.shuffle = true;
    }

    let core_config = config.to_core_config();
    core_config
        .validate()
        .map_err(RelaycastError::Configuration)?;

    log::info!(
        "Configuration: directory={}, server={}:{}, mount={}, loop={}, shuffle={}, reconnect_attempts={}",
        core_config.library.directory.display(),
        core_config.icecast.host,
        core_config.icecast.port,
        core_config.icecast.mount,
        core_config.library.looping,
        core_config.library.shuffle,
        core_config.reconnect.max_attempts
    );

    // Resolve external tools: explicit path, or fall back to PATH lookup
    let transcoder = match &core_config.transcode.ffmpeg_path {
        Some(path) => FfmpegTranscoder::new(path.clone()),
        None => FfmpegTranscoder::from_path().ok_or_else(|| {
            RelaycastError::Configuration(
                "ffmpeg not found on PATH; set transcode.ffmpeg_path".to_string(),
            )
        })?,
    }
    .with_bitrate(core_config.transcode.bitrate_kbps);

    let reader = match &core_config.probe.mediainfo_path {
        Some(path) => MediaInfoReader::new(path.clone()),
        None => MediaInfoReader::from_path().ok_or_else(|| {
            RelaycastError::Configuration(
                "mediainfo not found on PATH; set probe.mediainfo_path".to_string(),
            )
        })?,
    };

    let admin = if core_config.icecast.update_metadata {
        let client = IcecastAdminClient::new(
            core_config.icecast.endpoint(),
            core_config.icecast.mount.clone(),
            core_config.icecast.credentials(),
        )
        .context("Failed to build admin client")?;
        log::info!("Now-playing updates enabled");
        Some(client)
    } else {
        None
    };

    let cancel = CancellationToken::new();
    let mut supervisor = Supervisor::new(
        core_config,
        Arc::new(TcpConnector::default()),
        Arc::new(reader),
        Arc::new(transcoder),
        Arc::new(LoggingEventEmitter),
        cancel.clone(),
    );
    if let Some(admin) = admin {
        supervisor = supervisor.with_now_playing(Arc::new(admin));
    }

    // Cancel the run on Ctrl+C / SIGTERM
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            log::info!("Shutdown signal received, ending stream...");
            cancel.cancel();
        }
    });

    let mut run_handle = tokio::spawn(async move { supervisor.run().await });

    let grace = Duration::from_secs(config.shutdown_grace_secs);
    let joined = tokio::select! {
        joined = &mut run_handle => joined,
        _ = async {
            cancel.cancelled().await;
            tokio::time::sleep(grace).await;
        } => {
            log::warn!(
                "Unclean shutdown: run did not stop within {}s, aborting without ending the stream",
                grace.as_secs()
            );
            run_handle.abort();
            return Err(RelaycastError::ShutdownTimeout(grace).into());
        }
    };

    let summary = joined.context("Supervisor task failed")??;
    match summary.outcome {
        RunOutcome::Completed => log::info!(
            "Playlist complete: {} track(s), {} bytes",
            summary.tracks_streamed,
            summary.bytes_streamed
        ),
        RunOutcome::Cancelled => log::info!(
            "Stopped after {} track(s), {} bytes",
            summary.tracks_streamed,
            summary.bytes_streamed
        ),
    }

    log::info!("Shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
