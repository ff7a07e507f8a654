//! Image upload form field
//!
//! `UploadField` is a form field that turns a picked file into a hosted
//! image URL. It owns exactly one piece of state that matters to the form:
//! whether an upload is in flight. The field's *value* (the URL) belongs to
//! the parent form. The field only reads it at render time and proposes
//! changes through a `FieldListener`.
//!
//! # Flow
//!
//! ```text
//! select / select_path ──► status = Uploading ──► spawned task
//!                                                    │ read file
//!                                                    │ uploader.upload()
//!                                                    ▼
//!                        UploadOutcome ◄──── mpsc channel
//!                             │
//!                      apply_outcome()
//!                    ┌────────┴────────┐
//!                 Ok(url)            Err(cause)
//!          listener.on_change     status = Failed
//!          status = Idle          (policy: on_clear)
//! ```
//!
//! The host drains the channel on its own loop and calls `apply_outcome`, so
//! all state changes happen on the UI task.

mod liveness;

#[cfg(test)]
mod tests;

use liveness::{LivenessToken, MountGuard};

use crate::upload::{file_name_of, MediaUploader, SelectedFile, UploadError, UploadedMedia};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Status text shown while an upload is in flight
pub const UPLOADING_MESSAGE: &str = "Uploading image....";

/// Status text shown under a preview once the value is set
pub const UPLOADED_MESSAGE: &str = "Image Uploaded!";

// ─────────────────────────────────────────────────────────────────────────────
// Failure Policy
// ─────────────────────────────────────────────────────────────────────────────

/// What happens to the parent's value when an upload fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep whatever URL the field had before (default)
    #[default]
    Retain,
    /// Ask the parent to clear the value
    Clear,
}

impl FailurePolicy {
    /// Parse policy string from config
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "clear" => Self::Clear,
            "retain" => Self::Retain,
            other => {
                tracing::warn!(
                    "Unknown failure policy '{}' (expected \"retain\" or \"clear\"), using retain",
                    other
                );
                Self::Retain
            }
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retain => "retain",
            Self::Clear => "clear",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listener, status, outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Parent-side callback interface
pub trait FieldListener {
    /// A new URL is available for field `name`
    fn on_change(&mut self, url: &str, name: &str);

    /// The field asks for its value to be cleared (`FailurePolicy::Clear`)
    fn on_clear(&mut self, _name: &str) {}
}

/// Field status. `Uploading` is the in-progress flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldStatus {
    #[default]
    Idle,
    Uploading {
        file_name: String,
    },
    Failed {
        cause: UploadError,
    },
}

/// Result of one upload attempt, sent back from the upload task
#[derive(Debug)]
pub struct UploadOutcome {
    /// Name of the field that started the upload
    pub field: String,
    /// Attempt number at the time of selection
    pub attempt: u64,
    pub result: Result<UploadedMedia, UploadError>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Render plan
// ─────────────────────────────────────────────────────────────────────────────

/// One visible piece of the field, top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Label(String),
    UploadingMessage,
    Preview { src: String },
    UploadedMessage,
    ErrorMessage(String),
    FilePicker,
}

/// Decide what the field shows
///
/// Pure function of the label, the parent's value and the field status.
pub fn view(label_text: &str, value: Option<&str>, status: &FieldStatus) -> Vec<Element> {
    let mut elements = vec![Element::Label(label_text.to_string())];
    let value = value.filter(|v| !v.is_empty());

    match status {
        FieldStatus::Uploading { .. } => {
            elements.push(Element::UploadingMessage);
            return elements;
        }
        FieldStatus::Idle => {
            if let Some(src) = value {
                elements.push(Element::Preview {
                    src: src.to_string(),
                });
                elements.push(Element::UploadedMessage);
            }
        }
        FieldStatus::Failed { cause } => {
            if let Some(src) = value {
                elements.push(Element::Preview {
                    src: src.to_string(),
                });
            }
            elements.push(Element::ErrorMessage(cause.to_string()));
        }
    }

    elements.push(Element::FilePicker);
    elements
}

// ─────────────────────────────────────────────────────────────────────────────
// UploadField
// ─────────────────────────────────────────────────────────────────────────────

/// A single image upload field
pub struct UploadField {
    name: String,
    label_text: String,
    policy: FailurePolicy,
    status: FieldStatus,
    attempt: u64,
    /// Path typed into the picker, not yet selected
    picker: String,
    task: Option<JoinHandle<()>>,
    mount: MountGuard,
}

impl UploadField {
    pub fn new(name: impl Into<String>, label_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label_text: label_text.into(),
            policy: FailurePolicy::default(),
            status: FieldStatus::Idle,
            attempt: 0,
            picker: String::new(),
            task: None,
            mount: MountGuard::new(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label_text(&self) -> &str {
        &self.label_text
    }

    pub fn status(&self) -> &FieldStatus {
        &self.status
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.status, FieldStatus::Uploading { .. })
    }

    #[cfg(test)]
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Render plan for the current status and the parent's value
    pub fn view(&self, value: Option<&str>) -> Vec<Element> {
        view(&self.label_text, value, &self.status)
    }

    // ─── Picker input ────────────────────────────────────────

    pub fn picker_text(&self) -> &str {
        &self.picker
    }

    pub fn push_picker_char(&mut self, c: char) {
        self.picker.push(c);
    }

    pub fn pop_picker_char(&mut self) {
        self.picker.pop();
    }

    /// Take the typed path out of the picker, if any
    pub fn take_picker_path(&mut self) -> Option<PathBuf> {
        let path = self.picker.trim().to_string();
        self.picker.clear();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }

    // ─── Select and upload ───────────────────────────────────

    /// Start uploading an in-memory file
    ///
    /// Returns `false` (and does nothing) if an upload is already in flight.
    pub fn select(
        &mut self,
        file: SelectedFile,
        uploader: Arc<dyn MediaUploader>,
        outcomes: mpsc::Sender<UploadOutcome>,
    ) -> bool {
        let file_name = file.file_name.clone();
        self.begin(file_name, async move { Ok(file) }, uploader, outcomes)
    }

    /// Start uploading a file from disk
    ///
    /// The file is read on the upload task, after the field has switched to
    /// uploading. A read failure arrives as a normal failed outcome.
    pub fn select_path(
        &mut self,
        path: PathBuf,
        uploader: Arc<dyn MediaUploader>,
        outcomes: mpsc::Sender<UploadOutcome>,
    ) -> bool {
        let file_name = file_name_of(&path);
        self.begin(
            file_name,
            async move { SelectedFile::load(&path).await },
            uploader,
            outcomes,
        )
    }

    fn begin<L>(
        &mut self,
        file_name: String,
        load: L,
        uploader: Arc<dyn MediaUploader>,
        outcomes: mpsc::Sender<UploadOutcome>,
    ) -> bool
    where
        L: Future<Output = Result<SelectedFile, UploadError>> + Send + 'static,
    {
        if self.is_uploading() {
            tracing::warn!(
                "Ignoring selection for '{}': upload already in progress",
                self.name
            );
            return false;
        }

        self.attempt += 1;
        self.status = FieldStatus::Uploading {
            file_name: file_name.clone(),
        };

        tracing::info!(
            "Uploading {} for field '{}' via {} (attempt {})",
            file_name,
            self.name,
            uploader.name(),
            self.attempt
        );

        let field = self.name.clone();
        let attempt = self.attempt;
        let token = self.mount.token();

        let work = async move {
            let file = load.await?;
            uploader.upload(file).await
        };

        self.task = Some(tokio::spawn(async move {
            let result = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => result,
                Err(_) => Err(UploadError::Internal("upload task panicked".to_string())),
            };

            let outcome = UploadOutcome {
                field,
                attempt,
                result,
            };
            deliver(&token, &outcomes, outcome).await;
        }));

        true
    }

    /// Apply an upload outcome
    ///
    /// Every outcome for the current attempt clears the in-progress flag.
    /// Outcomes for another field or an older attempt are ignored.
    /// Returns `true` if the outcome was applied.
    pub fn apply_outcome(
        &mut self,
        outcome: UploadOutcome,
        listener: &mut dyn FieldListener,
    ) -> bool {
        if outcome.field != self.name {
            return false;
        }
        if !self.is_uploading() || outcome.attempt != self.attempt {
            tracing::debug!(
                "Ignoring stale outcome for '{}' (attempt {}, current {})",
                self.name,
                outcome.attempt,
                self.attempt
            );
            return false;
        }

        self.task = None;

        match outcome.result {
            Ok(media) => {
                self.status = FieldStatus::Idle;
                listener.on_change(&media.url, &self.name);
            }
            Err(cause) => {
                tracing::warn!("Upload for '{}' failed: {}", self.name, cause);
                self.status = FieldStatus::Failed { cause };
                if self.policy == FailurePolicy::Clear {
                    listener.on_clear(&self.name);
                }
            }
        }

        true
    }
}

/// Send an outcome to the host if its field still exists
///
/// Returns `true` if the outcome was handed to the channel.
async fn deliver(
    token: &LivenessToken,
    outcomes: &mpsc::Sender<UploadOutcome>,
    outcome: UploadOutcome,
) -> bool {
    if !token.is_alive() {
        tracing::debug!("Field '{}' is gone, dropping upload result", outcome.field);
        return false;
    }

    match outcomes.send(outcome).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Form closed before upload of '{}' finished", e.0.field);
            false
        }
    }
}

impl Drop for UploadField {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
