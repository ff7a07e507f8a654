// imgfield - image upload form field for the terminal
//
// Pick an image, send it to a media endpoint as one multipart POST and keep
// the returned URL as the field's value.
//
// Architecture:
// - Field (field/): upload state machine, render plan, liveness guard
// - Upload (upload/): MediaUploader trait and the multipart HTTP client
// - TUI (ratatui): the host form that owns field values
// - Config: env > file > defaults, injected into everything below main
// - Event system: upload tasks report back over an mpsc channel

mod cli;
mod config;
mod field;
mod logging;
mod tui;
mod upload;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, LogRotation, LoggingConfig};
use logging::{LogBuffer, TuiLogLayer};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with conditional output
///
/// In TUI mode logs are captured to the buffer (prevents garbling the
/// display). Otherwise they go to stderr so stdout stays clean for URLs.
/// File logging optionally writes JSON lines to rotating files as well.
///
/// Precedence: RUST_LOG env var > config file > default "info"
///
/// The returned guard must be kept alive for the duration of the program to
/// ensure file logs flush.
fn init_tracing(config: &Config, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("imgfield={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let tui_layer = config
        .enable_tui
        .then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer = (!config.enable_tui)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let (file_layer, guard) = match file_writer(&config.logging) {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Rolling non-blocking file writer, if file logging is enabled
fn file_writer(
    logging: &LoggingConfig,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if !logging.file_enabled {
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&logging.file_dir) {
        // Fall back to non-file logging
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            logging.file_dir, e
        );
        return None;
    }

    let appender = match logging.file_rotation {
        LogRotation::Hourly => {
            tracing_appender::rolling::hourly(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Daily => {
            tracing_appender::rolling::daily(&logging.file_dir, &logging.file_prefix)
        }
        LogRotation::Never => {
            tracing_appender::rolling::never(&logging.file_dir, &logging.file_prefix)
        }
    };

    Some(tracing_appender::non_blocking(appender))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands print and exit before anything else starts
    if cli::handle_config_command(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if matches!(cli.command, Some(Commands::Upload { .. })) {
        config.enable_tui = false;
    }

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, &log_buffer);

    let uploader = upload::create_uploader(&config.upload);
    tracing::debug!(
        "Uploader: {} (ready: {})",
        uploader.name(),
        uploader.is_ready()
    );

    match cli.command {
        Some(Commands::Upload {
            file,
            name,
            stdin_name,
        }) => {
            let source = cli::UploadSource::from_arg(file, &stdin_name).await?;
            if !cli::run_upload(&config, uploader, source, &name).await {
                std::process::exit(1);
            }
        }
        _ if config.enable_tui => {
            tracing::info!("Starting form");
            tui::run_form(config, log_buffer, uploader).await?;
        }
        _ => {
            eprintln!("TUI disabled (IMGFIELD_NO_TUI). Use `imgfield upload <FILE>` instead.");
            std::process::exit(2);
        }
    }

    Ok(())
}
