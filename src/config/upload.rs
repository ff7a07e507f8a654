//! Upload destination and form field configuration

use crate::field::FailurePolicy;
use serde::Deserialize;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ─────────────────────────────────────────────────────────────────────────────
// Upload destination
// ─────────────────────────────────────────────────────────────────────────────

/// Where and how files are uploaded
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Media service upload endpoint (e.g. https://api.cloudinary.com/v1_1/<cloud>/image/upload)
    pub endpoint_url: Option<String>,
    /// Server-side preset identifier sent with every upload
    pub upload_preset: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// What a failed upload does to the field's value
    pub on_failure: FailurePolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            upload_preset: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            on_failure: FailurePolicy::Retain,
        }
    }
}

/// Upload settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileUpload {
    pub endpoint_url: Option<String>,
    pub upload_preset: Option<String>,
    pub timeout_secs: Option<u64>,
    pub on_failure: Option<String>,
}

impl UploadConfig {
    /// Create from file config with env overrides
    ///
    /// `env` looks up a variable by name; the caller decides where from.
    pub fn from_file(file: Option<FileUpload>, env: &dyn Fn(&str) -> Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            endpoint_url: non_blank(env("IMGFIELD_UPLOAD_URL").or(file.endpoint_url)),
            upload_preset: non_blank(env("IMGFIELD_UPLOAD_PRESET").or(file.upload_preset)),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            on_failure: env("IMGFIELD_ON_FAILURE")
                .or(file.on_failure)
                .map(|s| FailurePolicy::from_str(&s))
                .unwrap_or(defaults.on_failure),
        }
    }

    /// Whether both endpoint and preset are present
    pub fn is_configured(&self) -> bool {
        non_blank(self.endpoint_url.clone()).is_some()
            && non_blank(self.upload_preset.clone()).is_some()
    }
}

/// Blank strings count as unset
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Form fields
// ─────────────────────────────────────────────────────────────────────────────

/// One upload field in the form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    /// Field identifier, passed back with every change
    pub name: String,
    /// Label shown above the field
    pub label: String,
    /// Initial value (an already uploaded URL)
    #[serde(default)]
    pub value: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            value: None,
        }
    }

    /// The form used when no fields are configured
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("logo", "Studio Logo")]
    }
}
