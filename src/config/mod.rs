//! Configuration for the upload form
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/imgfield/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! Only `main` and the CLI read the process environment. Everything below
//! them gets a resolved `Config` (or one of its parts) handed in.

use serde::Deserialize;
use std::path::PathBuf;

mod logging;
mod serialization;
mod upload;


pub use logging::{FileLogging, LogRotation, LoggingConfig};
pub use upload::{FieldSpec, FileUpload, UploadConfig};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to run the TUI form (headless commands ignore this)
    pub enable_tui: bool,

    /// Theme name: "dark", "light", "nord"
    pub theme: String,

    /// Upload destination
    pub upload: UploadConfig,

    /// Fields shown in the form, in order
    pub fields: Vec<FieldSpec>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_tui: true,
            theme: "dark".to_string(),
            upload: UploadConfig::default(),
            fields: FieldSpec::defaults(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,

    /// Optional [upload] section
    pub upload: Option<FileUpload>,

    /// Optional [[fields]] entries
    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

impl Config {
    /// Get the config file path: ~/.config/imgfield/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("imgfield").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// # Panics
    /// Exits the process if the file exists but cannot be read or parsed. A
    /// broken config should fail loudly instead of silently uploading to the
    /// wrong place.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run `imgfield config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), &|key: &str| std::env::var(key).ok())
    }

    /// Merge a parsed file config with an environment lookup
    pub(crate) fn resolve(file: FileConfig, env: &dyn Fn(&str) -> Option<String>) -> Self {
        // TUI toggle: env only (runtime flag)
        let enable_tui = env("IMGFIELD_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        let theme = env("IMGFIELD_THEME")
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        let upload = UploadConfig::from_file(file.upload, env);
        let logging = LoggingConfig::from_file(file.logging);

        // Field names are the form's keys; the first one wins on duplicates
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(file.fields.len());
        for spec in file.fields {
            if fields.iter().any(|f| f.name == spec.name) {
                eprintln!("Ignoring duplicate field '{}' in config", spec.name);
                continue;
            }
            fields.push(spec);
        }
        if fields.is_empty() {
            fields = FieldSpec::defaults();
        }

        Self {
            enable_tui,
            theme,
            upload,
            fields,
            logging,
        }
    }
}
