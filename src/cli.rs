// CLI module - command-line argument parsing and handlers
//
// Provides subcommands next to the default TUI form:
// - upload <FILE>: upload one image without the TUI, print its URL
//   (`-` reads the image from stdin)
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults

use crate::config::{Config, VERSION};
use crate::field::{FieldListener, FieldStatus, UploadField};
use crate::upload::{MediaUploader, SelectedFile};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

/// imgfield - image upload form field for the terminal
#[derive(Parser)]
#[command(name = "imgfield")]
#[command(version = VERSION)]
#[command(about = "Pick an image, upload it, keep the URL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload one image without the TUI and print its URL
    Upload {
        /// Image file to upload, or `-` to read it from stdin
        file: PathBuf,

        /// Field name reported with the URL
        #[arg(long, default_value = "logo")]
        name: String,

        /// File name sent for stdin input (its extension sets the content type)
        #[arg(long, default_value = "upload.png")]
        stdin_name: String,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Handle `config` subcommands. Returns true if a command was handled (exit after).
pub fn handle_config_command(cli: &Cli) -> bool {
    let Some(Commands::Config { show, reset, path }) = &cli.command else {
        return false;
    };

    if *path {
        handle_config_path();
    } else if *show {
        handle_config_show();
    } else if *reset {
        handle_config_reset();
    } else {
        // No flag provided, show help
        println!("Usage: imgfield config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    true
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("theme = {:?}", config.theme);
    println!();
    println!("[upload]");
    match &config.upload.endpoint_url {
        Some(url) => println!("endpoint_url = {:?}", url),
        None => println!("# endpoint_url not set"),
    }
    match &config.upload.upload_preset {
        Some(preset) => println!("upload_preset = {:?}", preset),
        None => println!("# upload_preset not set"),
    }
    println!("timeout_secs = {}", config.upload.timeout_secs);
    println!("on_failure = {:?}", config.upload.on_failure.as_str());
    if !config.upload.is_configured() {
        println!("# uploads disabled until endpoint_url and upload_preset are set");
    }
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!(
        "file_dir = {:?}",
        config.logging.file_dir.display().to_string()
    );
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());
    for field in &config.fields {
        println!();
        println!("[[fields]]");
        println!("name = {:?}", field.name);
        println!("label = {:?}", field.label);
        if let Some(value) = &field.value {
            println!("value = {:?}", value);
        }
    }

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless upload
// ─────────────────────────────────────────────────────────────────────────────

/// Listener that prints the URL to stdout
#[derive(Debug, Default)]
struct PrintListener {
    url: Option<String>,
}

impl FieldListener for PrintListener {
    fn on_change(&mut self, url: &str, name: &str) {
        tracing::info!("Field '{}' uploaded", name);
        println!("{}", url);
        self.url = Some(url.to_string());
    }

    fn on_clear(&mut self, name: &str) {
        tracing::info!("Field '{}' cleared after failed upload", name);
    }
}

/// Where the headless upload takes its image from
#[derive(Debug)]
pub enum UploadSource {
    /// Read on the upload task, after the field switched to uploading
    Path(PathBuf),
    /// Already in memory (stdin)
    Loaded(SelectedFile),
}

impl UploadSource {
    /// Resolve the `upload` argument; `-` drains stdin
    pub async fn from_arg(file: PathBuf, stdin_name: &str) -> Result<Self> {
        if file.as_os_str() != "-" {
            return Ok(Self::Path(file));
        }

        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .context("Failed to read image from stdin")?;
        Ok(Self::Loaded(SelectedFile::new(stdin_name, bytes)))
    }
}

/// Upload one file through an `UploadField`. Returns true on success.
pub async fn run_upload(
    config: &Config,
    uploader: Arc<dyn MediaUploader>,
    source: UploadSource,
    name: &str,
) -> bool {
    let label = config
        .fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.label.clone())
        .unwrap_or_else(|| name.to_string());

    let mut field = UploadField::new(name, label).with_policy(config.upload.on_failure);
    let (outcome_tx, mut outcome_rx) = mpsc::channel(1);

    let started = match source {
        UploadSource::Path(path) => field.select_path(path, uploader, outcome_tx),
        UploadSource::Loaded(file) => field.select(file, uploader, outcome_tx),
    };
    if !started {
        eprintln!("Error: field '{}' is already uploading", name);
        return false;
    }

    let Some(outcome) = outcome_rx.recv().await else {
        eprintln!("Error: upload task ended without a result");
        return false;
    };

    let mut listener = PrintListener::default();
    field.apply_outcome(outcome, &mut listener);

    match field.status() {
        FieldStatus::Failed { cause } => {
            eprintln!("Upload failed: {}", cause);
            false
        }
        _ => listener.url.is_some(),
    }
}
