//! Upload field behaviour tests
//!
//! Uploads go through a gated fake so each test decides when (and how) the
//! network call resolves.

use super::*;
use crate::upload::{MediaUploader, SelectedFile, UploadError, UploadedMedia};
use crate::logging::{LogBuffer, TuiLogLayer};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing_subscriber::layer::SubscriberExt;

type Reply = Result<UploadedMedia, UploadError>;

/// Uploader that waits for the test to supply the reply
struct GatedUploader {
    gate: Mutex<Option<oneshot::Receiver<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl GatedUploader {
    fn new() -> (Arc<Self>, oneshot::Sender<Reply>) {
        let (tx, rx) = oneshot::channel();
        let uploader = Arc::new(Self {
            gate: Mutex::new(Some(rx)),
            calls: Mutex::new(Vec::new()),
        });
        (uploader, tx)
    }
}

#[async_trait]
impl MediaUploader for GatedUploader {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn upload(&self, file: SelectedFile) -> Result<UploadedMedia, UploadError> {
        self.calls.lock().unwrap().push(file.file_name.clone());
        let gate = self.gate.lock().unwrap().take();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(UploadError::Internal("gate dropped".to_string()))),
            None => Err(UploadError::Internal("uploader already used".to_string())),
        }
    }
}

/// Listener that records every callback
#[derive(Default)]
struct Recorder {
    changes: Vec<(String, String)>,
    clears: Vec<String>,
    value: Option<String>,
}

impl FieldListener for Recorder {
    fn on_change(&mut self, url: &str, name: &str) {
        self.changes.push((url.to_string(), name.to_string()));
        self.value = Some(url.to_string());
    }

    fn on_clear(&mut self, name: &str) {
        self.clears.push(name.to_string());
        self.value = None;
    }
}

fn media(url: &str) -> UploadedMedia {
    UploadedMedia {
        url: url.to_string(),
        public_id: None,
    }
}

fn logo_file() -> SelectedFile {
    SelectedFile::new("logo.png", b"PNG".to_vec())
}

// ─────────────────────────────────────────────────────────────────────────────
// Render policy
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_view_without_value_shows_only_picker() {
    let field = UploadField::new("logo", "Studio Logo");
    assert_eq!(
        field.view(None),
        vec![
            Element::Label("Studio Logo".to_string()),
            Element::FilePicker
        ]
    );
}

#[test]
fn test_view_with_value_shows_preview_and_uploaded() {
    let field = UploadField::new("logo", "Studio Logo");
    assert_eq!(
        field.view(Some("https://cdn.example/a.png")),
        vec![
            Element::Label("Studio Logo".to_string()),
            Element::Preview {
                src: "https://cdn.example/a.png".to_string()
            },
            Element::UploadedMessage,
            Element::FilePicker,
        ]
    );
}

#[test]
fn test_view_while_uploading_ignores_value() {
    let status = FieldStatus::Uploading {
        file_name: "logo.png".to_string(),
    };
    let expected = vec![
        Element::Label("Logo".to_string()),
        Element::UploadingMessage,
    ];
    assert_eq!(view("Logo", None, &status), expected);
    assert_eq!(view("Logo", Some("https://cdn.example/a.png"), &status), expected);
}

#[test]
fn test_view_failed_shows_error_not_uploaded() {
    let status = FieldStatus::Failed {
        cause: UploadError::Status {
            status: 500,
            message: String::new(),
        },
    };
    let elements = view("Logo", Some("https://cdn.example/old.png"), &status);
    assert!(elements.contains(&Element::Preview {
        src: "https://cdn.example/old.png".to_string()
    }));
    assert!(elements.contains(&Element::ErrorMessage("Upload rejected (500)".to_string())));
    assert!(!elements.contains(&Element::UploadedMessage));
    assert_eq!(elements.last(), Some(&Element::FilePicker));
}

#[test]
fn test_view_treats_empty_value_as_absent() {
    assert_eq!(
        view("Logo", Some(""), &FieldStatus::Idle),
        vec![Element::Label("Logo".to_string()), Element::FilePicker]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Select and upload
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_successful_upload_reports_url_once() {
    let (uploader, gate) = GatedUploader::new();
    let (tx, mut rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo");
    let mut parent = Recorder::default();

    assert!(!field.is_uploading());
    assert!(field.select(logo_file(), uploader.clone(), tx));

    // Flag is set before the network call resolves
    assert!(field.is_uploading());
    assert_eq!(
        field.view(parent.value.as_deref()),
        vec![
            Element::Label("Studio Logo".to_string()),
            Element::UploadingMessage
        ]
    );

    gate.send(Ok(media("https://cdn.example/logo.png"))).unwrap();
    let outcome = rx.recv().await.unwrap();
    assert!(field.apply_outcome(outcome, &mut parent));

    assert_eq!(
        parent.changes,
        vec![(
            "https://cdn.example/logo.png".to_string(),
            "logo".to_string()
        )]
    );
    assert!(!field.is_uploading());
    assert_eq!(uploader.calls.lock().unwrap().as_slice(), ["logo.png"]);

    let elements = field.view(parent.value.as_deref());
    assert!(elements.contains(&Element::Preview {
        src: "https://cdn.example/logo.png".to_string()
    }));
    assert!(elements.contains(&Element::UploadedMessage));
}

#[tokio::test]
async fn test_failed_upload_resets_flag_without_callback() {
    let (uploader, gate) = GatedUploader::new();
    let (tx, mut rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo");
    let mut parent = Recorder {
        value: Some("https://cdn.example/old.png".to_string()),
        ..Default::default()
    };

    field.select(logo_file(), uploader, tx);
    gate.send(Err(UploadError::Status {
        status: 500,
        message: "boom".to_string(),
    }))
    .unwrap();

    let outcome = rx.recv().await.unwrap();
    assert!(field.apply_outcome(outcome, &mut parent));

    assert!(!field.is_uploading());
    assert!(parent.changes.is_empty());
    assert!(parent.clears.is_empty(), "retain policy must not clear");
    assert_eq!(parent.value.as_deref(), Some("https://cdn.example/old.png"));
    assert!(matches!(field.status(), FieldStatus::Failed { .. }));
}

#[tokio::test]
async fn test_missing_url_failure_with_clear_policy() {
    let (uploader, gate) = GatedUploader::new();
    let (tx, mut rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo").with_policy(FailurePolicy::Clear);
    let mut parent = Recorder {
        value: Some("https://cdn.example/old.png".to_string()),
        ..Default::default()
    };

    field.select(logo_file(), uploader, tx);
    gate.send(Err(UploadError::MalformedResponse(
        "response has no url field".to_string(),
    )))
    .unwrap();
    field.apply_outcome(rx.recv().await.unwrap(), &mut parent);

    assert!(!field.is_uploading());
    assert!(parent.changes.is_empty());
    assert_eq!(parent.clears, vec!["logo".to_string()]);
    assert_eq!(parent.value, None);
}

#[tokio::test]
async fn test_second_selection_rejected_while_uploading() {
    let (uploader, _gate) = GatedUploader::new();
    let (tx, _rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo");

    assert!(field.select(logo_file(), uploader.clone(), tx.clone()));
    assert!(!field.select(logo_file(), uploader, tx));
    assert_eq!(field.attempt(), 1);
}

#[tokio::test]
async fn test_stale_and_foreign_outcomes_are_ignored() {
    let (uploader, _gate) = GatedUploader::new();
    let (tx, _rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo");
    let mut parent = Recorder::default();

    field.select(logo_file(), uploader, tx);

    let foreign = UploadOutcome {
        field: "banner".to_string(),
        attempt: 1,
        result: Ok(media("https://cdn.example/banner.png")),
    };
    assert!(!field.apply_outcome(foreign, &mut parent));

    let stale = UploadOutcome {
        field: "logo".to_string(),
        attempt: 0,
        result: Ok(media("https://cdn.example/old.png")),
    };
    assert!(!field.apply_outcome(stale, &mut parent));

    assert!(field.is_uploading());
    assert!(parent.changes.is_empty());
}

#[tokio::test]
async fn test_dropped_field_never_delivers() {
    let (uploader, gate) = GatedUploader::new();
    let (tx, mut rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo");

    field.select(logo_file(), uploader, tx);
    drop(field);

    // The task is aborted with the field; its sender goes with it
    let _ = gate.send(Ok(media("https://cdn.example/logo.png")));
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_finished_upload_for_dropped_field_is_discarded() {
    let (tx, mut rx) = mpsc::channel(8);
    let guard = MountGuard::new();
    let token = guard.token();
    let outcome = |attempt| UploadOutcome {
        field: "logo".to_string(),
        attempt,
        result: Ok(media("https://cdn.example/logo.png")),
    };

    assert!(deliver(&token, &tx, outcome(1)).await);
    assert_eq!(rx.recv().await.map(|o| o.attempt), Some(1));

    // Upload finished after the field went away; the channel is still open
    drop(guard);
    assert!(!deliver(&token, &tx, outcome(2)).await);
    assert!(matches!(
        rx.try_recv(),
        Err(mpsc::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn test_unreadable_path_fails_after_flag_is_set() {
    let (uploader, _gate) = GatedUploader::new();
    let (tx, mut rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo");
    let mut parent = Recorder::default();

    assert!(field.select_path(
        PathBuf::from("/definitely/not/here/logo.png"),
        uploader.clone(),
        tx
    ));
    assert_eq!(
        field.status(),
        &FieldStatus::Uploading {
            file_name: "logo.png".to_string()
        }
    );

    field.apply_outcome(rx.recv().await.unwrap(), &mut parent);
    assert!(matches!(
        field.status(),
        FieldStatus::Failed {
            cause: UploadError::FileRead { .. }
        }
    ));
    assert!(uploader.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_retry_after_failure_clears_error() {
    let (first, gate) = GatedUploader::new();
    let (tx, mut rx) = mpsc::channel(8);
    let mut field = UploadField::new("logo", "Studio Logo");
    let mut parent = Recorder::default();

    field.select(logo_file(), first, tx.clone());
    gate.send(Err(UploadError::Transport("reset".to_string())))
        .unwrap();
    field.apply_outcome(rx.recv().await.unwrap(), &mut parent);
    assert!(matches!(field.status(), FieldStatus::Failed { .. }));

    let (second, gate) = GatedUploader::new();
    field.select(logo_file(), second, tx);
    gate.send(Ok(media("https://cdn.example/logo.png"))).unwrap();
    field.apply_outcome(rx.recv().await.unwrap(), &mut parent);

    assert_eq!(field.status(), &FieldStatus::Idle);
    assert_eq!(field.attempt(), 2);
    assert_eq!(parent.changes.len(), 1);
}

#[test]
fn test_picker_input_round() {
    let mut field = UploadField::new("logo", "Studio Logo");
    for c in " ./logo.pngx".chars() {
        field.push_picker_char(c);
    }
    field.pop_picker_char();
    assert_eq!(field.picker_text(), " ./logo.png");
    assert_eq!(field.take_picker_path(), Some(PathBuf::from("./logo.png")));
    assert_eq!(field.picker_text(), "");
    assert_eq!(field.take_picker_path(), None);
}

#[test]
fn test_failure_policy_parsing() {
    assert_eq!(FailurePolicy::from_str("CLEAR"), FailurePolicy::Clear);
    assert_eq!(FailurePolicy::from_str("retain"), FailurePolicy::Retain);
    assert_eq!(FailurePolicy::from_str("bogus"), FailurePolicy::Retain);
    assert_eq!(FailurePolicy::Clear.as_str(), "clear");
}

#[test]
fn test_unknown_failure_policy_warns() {
    let buffer = LogBuffer::new();
    let subscriber = tracing_subscriber::registry().with(TuiLogLayer::new(buffer.clone()));

    let policy = tracing::subscriber::with_default(subscriber, || {
        assert_eq!(FailurePolicy::from_str(" Clear "), FailurePolicy::Clear);
        FailurePolicy::from_str("clera")
    });

    assert_eq!(policy, FailurePolicy::Retain);
    let entries = buffer.recent(10);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, crate::logging::LogLevel::Warn);
    assert!(entries[0].message.contains("clera"));
}
