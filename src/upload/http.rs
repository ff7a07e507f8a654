//! HTTP uploader for hosted media services
//!
//! Sends one multipart POST per file with two fields:
//! - `file`: the raw bytes, with file name and guessed MIME type
//! - `upload_preset`: the deployment's preset identifier
//!
//! A successful response is JSON carrying a string `url`. Error bodies in the
//! `{"error": {"message": "..."}}` shape have their message surfaced.

use super::{MediaUploader, SelectedFile, UploadError, UploadedMedia};
use crate::config::UploadConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

/// Longest error body excerpt kept in `UploadError::Status`
const MAX_ERROR_BODY: usize = 200;

/// Multipart uploader backed by `reqwest`
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint_url: String,
    upload_preset: String,
}

impl HttpUploader {
    /// Create an uploader from configuration
    ///
    /// # Errors
    /// `NotConfigured` if the endpoint URL or preset is missing,
    /// `Transport` if the HTTP client cannot be built.
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let endpoint_url = config
            .endpoint_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or(UploadError::NotConfigured("endpoint URL"))?;
        let upload_preset = config
            .upload_preset
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or(UploadError::NotConfigured("upload preset"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UploadError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized media uploader: {} (preset: {}, timeout: {}s)",
            endpoint_url,
            upload_preset,
            config.timeout_secs
        );

        Ok(Self {
            client,
            endpoint_url,
            upload_preset,
        })
    }

    fn build_form(&self, file: SelectedFile) -> Result<Form, UploadError> {
        let mime = file.mime_type();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&mime)
            .map_err(|e| UploadError::Transport(format!("Invalid MIME type {}: {}", mime, e)))?;

        Ok(Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone()))
    }

    async fn parse_response(
        &self,
        response: reqwest::Response,
    ) -> Result<UploadedMedia, UploadError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(UploadError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_upload_body(&body)
    }
}

/// Media service response, only the fields we read
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
    public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn parse_upload_body(body: &str) -> Result<UploadedMedia, UploadError> {
    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|e| UploadError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

    match parsed.url {
        Some(url) if !url.is_empty() => Ok(UploadedMedia {
            url,
            public_id: parsed.public_id,
        }),
        _ => Err(UploadError::MalformedResponse(
            "response has no url field".to_string(),
        )),
    }
}

/// Pull a readable message out of an error body
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.error.message;
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl MediaUploader for HttpUploader {
    fn name(&self) -> &'static str {
        "http"
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn upload(&self, file: SelectedFile) -> Result<UploadedMedia, UploadError> {
        let file_name = file.file_name.clone();
        let size = file.bytes.len();
        let form = self.build_form(file)?;

        tracing::debug!("POST {} ({}, {} bytes)", self.endpoint_url, file_name, size);

        let response = self
            .client
            .post(&self.endpoint_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(format!("Request failed: {}", e)))?;

        let media = self.parse_response(response).await?;
        tracing::info!("Uploaded {} -> {}", file_name, media.url);
        Ok(media)
    }
}
