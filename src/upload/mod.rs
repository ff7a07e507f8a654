//! Media upload abstraction
//!
//! The upload field never talks HTTP directly. It hands a selected file to a
//! `MediaUploader` and waits for a URL or an `UploadError`.
//!
//! # Architecture
//!
//! ```text
//! MediaUploader trait
//! ├── NoOpUploader  (endpoint or preset missing; every upload fails)
//! └── HttpUploader  (multipart POST to a hosted media service)
//! ```
//!
//! Endpoint URL and upload preset are injected when the uploader is built.
//! Nothing in here reads process environment.

mod http;

pub use http::HttpUploader;

use crate::config::UploadConfig;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors that can occur while uploading a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Endpoint URL or upload preset is not configured
    NotConfigured(&'static str),
    /// The selected file could not be read
    FileRead { path: PathBuf, message: String },
    /// Connection, timeout or body read failure
    Transport(String),
    /// Endpoint answered with a non-success status
    Status { status: u16, message: String },
    /// Body was not JSON or had no string `url` field
    MalformedResponse(String),
    /// The upload task itself failed
    Internal(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured(what) => write!(f, "Upload not configured: missing {}", what),
            Self::FileRead { path, message } => {
                write!(f, "Could not read {}: {}", path.display(), message)
            }
            Self::Transport(msg) => write!(f, "Network error: {}", msg),
            Self::Status { status, message } => {
                if message.is_empty() {
                    write!(f, "Upload rejected ({})", status)
                } else {
                    write!(f, "Upload rejected ({}): {}", status, message)
                }
            }
            Self::MalformedResponse(msg) => write!(f, "Unexpected response: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for UploadError {}

/// A file picked by the user, loaded into memory
#[derive(Debug, Clone)]
pub struct SelectedFile {
    /// File name sent in the multipart part (no directories)
    pub file_name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn load(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::FileRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self::new(file_name_of(path), bytes))
    }

    /// MIME type guessed from the file extension
    ///
    /// Only used to label the multipart part. Unknown extensions are sent as
    /// `application/octet-stream` and left for the media service to judge.
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Last path component, or "upload" when the path has none
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// A successfully stored asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Public URL reported by the media service
    pub url: String,
    /// Service-side identifier, when the response carries one
    pub public_id: Option<String>,
}

/// Trait for media upload backends
///
/// Implementations must be `Send + Sync`: one uploader is shared by every
/// field in a form and used from spawned tasks.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Whether uploads can succeed at all with this backend
    fn is_ready(&self) -> bool;

    /// Upload a single file and return the stored asset
    async fn upload(&self, file: SelectedFile) -> Result<UploadedMedia, UploadError>;
}

/// Uploader used when the endpoint or preset is missing
///
/// Every upload fails with `UploadError::NotConfigured`, so the form still
/// opens and shows the problem on the field itself.
#[derive(Debug)]
pub struct NoOpUploader {
    missing: &'static str,
}

impl NoOpUploader {
    pub fn new(missing: &'static str) -> Self {
        Self { missing }
    }
}

#[async_trait]
impl MediaUploader for NoOpUploader {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn is_ready(&self) -> bool {
        false
    }

    async fn upload(&self, _file: SelectedFile) -> Result<UploadedMedia, UploadError> {
        Err(UploadError::NotConfigured(self.missing))
    }
}

/// Create an uploader from configuration
pub fn create_uploader(config: &UploadConfig) -> Arc<dyn MediaUploader> {
    match HttpUploader::new(config) {
        Ok(uploader) => Arc::new(uploader),
        Err(UploadError::NotConfigured(missing)) => {
            tracing::warn!("Media upload disabled: {} not set", missing);
            Arc::new(NoOpUploader::new(missing))
        }
        Err(e) => {
            tracing::error!("Failed to create upload client: {}", e);
            Arc::new(NoOpUploader::new("working HTTP client"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(SelectedFile::new("logo.png", vec![]).mime_type(), "image/png");
        assert_eq!(SelectedFile::new("a.JPEG", vec![]).mime_type(), "image/jpeg");
        assert_eq!(SelectedFile::new("scan.tiff", vec![]).mime_type(), "image/tiff");
        assert_eq!(
            SelectedFile::new("favicon.ico", vec![]).mime_type(),
            "image/x-icon"
        );
        assert_eq!(
            SelectedFile::new("notes", vec![]).mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_file_name_of_strips_directories() {
        assert_eq!(file_name_of(Path::new("/tmp/studio/logo.png")), "logo.png");
        assert_eq!(file_name_of(Path::new("/")), "upload");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_file_read_error() {
        let err = SelectedFile::load(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::FileRead { .. }));
    }

    #[tokio::test]
    async fn test_unconfigured_uploader_fails_every_upload() {
        let uploader = create_uploader(&UploadConfig::default());
        assert!(!uploader.is_ready());

        let err = uploader
            .upload(SelectedFile::new("logo.png", vec![1, 2, 3]))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::NotConfigured(_)));
    }

    #[test]
    fn test_status_error_display() {
        let err = UploadError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "Upload rejected (500)");
    }
}
