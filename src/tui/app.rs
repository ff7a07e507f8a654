// TUI form state
//
// The form is the parent container of its upload fields. It owns the field
// values, decides which field has focus, starts uploads when a field submits
// a path, and applies upload outcomes as they arrive.

use super::clipboard::copy_to_clipboard;
use super::components::{FieldPanel, LogsPanel, StatusBar, Toast, ToastKind};
use super::theme::Theme;
use super::traits::{ComponentId, Handled, Interactive};
use crate::config::{Config, FieldSpec};
use crate::field::{FieldListener, FieldStatus, UploadField, UploadOutcome};
use crate::logging::LogBuffer;
use crate::upload::MediaUploader;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Outcome channel capacity; one pending outcome per field is the norm
const OUTCOME_BUFFER: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Form values
// ─────────────────────────────────────────────────────────────────────────────

/// Field values owned by the form, keyed by field name
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    values: HashMap<String, Option<String>>,
}

impl FormValues {
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        Self {
            values: specs
                .iter()
                .map(|s| (s.name.clone(), s.value.clone()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    pub fn set(&mut self, name: &str, value: Option<String>) {
        self.values.insert(name.to_string(), value);
    }

    /// Number of fields holding a URL
    pub fn filled_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }
}

impl FieldListener for FormValues {
    fn on_change(&mut self, url: &str, name: &str) {
        tracing::info!("Field '{}' set to {}", name, url);
        self.set(name, Some(url.to_string()));
    }

    fn on_clear(&mut self, name: &str) {
        tracing::info!("Field '{}' cleared", name);
        self.set(name, None);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App
// ─────────────────────────────────────────────────────────────────────────────

/// Main application state for the TUI form
pub struct App {
    pub fields: Vec<FieldPanel>,
    pub values: FormValues,
    /// Index of the focused field
    pub focus: usize,
    pub theme: Theme,
    pub logs: LogsPanel,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    animation_frame: usize,
    uploader: Arc<dyn MediaUploader>,
    outcome_tx: mpsc::Sender<UploadOutcome>,
}

impl App {
    /// Build the form from config
    ///
    /// Returns the receiving end of the upload outcome channel; the event
    /// loop drains it and hands each outcome to `apply_outcome`.
    pub fn new(
        config: &Config,
        uploader: Arc<dyn MediaUploader>,
        log_buffer: LogBuffer,
    ) -> (Self, mpsc::Receiver<UploadOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_BUFFER);

        let fields = config
            .fields
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let field = UploadField::new(&spec.name, &spec.label)
                    .with_policy(config.upload.on_failure);
                FieldPanel::new(i, field)
            })
            .collect();

        let app = Self {
            fields,
            values: FormValues::from_specs(&config.fields),
            focus: 0,
            theme: Theme::by_name(&config.theme),
            logs: LogsPanel::new(log_buffer),
            toast: None,
            should_quit: false,
            animation_frame: 0,
            uploader,
            outcome_tx,
        };

        (app, outcome_rx)
    }

    pub fn focused_id(&self) -> ComponentId {
        ComponentId::Field(self.focus)
    }

    pub fn animation_frame(&self) -> usize {
        self.animation_frame
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Advance spinners and expire the toast
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }

    /// Handle keyboard input
    /// Layered dispatch: Global → Focused field
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('y') if ctrl => {
                self.copy_focused_url();
                return;
            }
            KeyCode::Tab => {
                self.focus_next();
                return;
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return;
            }
            _ => {}
        }

        let Some(panel) = self.fields.get_mut(self.focus) else {
            return;
        };
        if panel.handle_key(key) == Handled::Yes {
            if let Some(path) = panel.take_submission() {
                self.start_upload(self.focus, path);
            }
        }
    }

    /// Select a file for the field at `index`
    pub fn start_upload(&mut self, index: usize, path: PathBuf) -> bool {
        let Some(panel) = self.fields.get_mut(index) else {
            return false;
        };
        panel
            .field
            .select_path(path, Arc::clone(&self.uploader), self.outcome_tx.clone())
    }

    /// Route an upload outcome to its field
    pub fn apply_outcome(&mut self, outcome: UploadOutcome) {
        let Some(panel) = self
            .fields
            .iter_mut()
            .find(|p| p.field.name() == outcome.field)
        else {
            tracing::debug!("Dropping outcome for unknown field '{}'", outcome.field);
            return;
        };

        if !panel.field.apply_outcome(outcome, &mut self.values) {
            return;
        }

        self.toast = Some(match panel.field.status() {
            FieldStatus::Failed { cause } => Toast::error(format!("✗ {}", cause)),
            _ => Toast::new(
                format!("✓ {} uploaded", panel.field.label_text()),
                ToastKind::Success,
            ),
        });
    }

    fn copy_focused_url(&mut self) {
        let Some(panel) = self.fields.get(self.focus) else {
            return;
        };
        let Some(url) = self.values.get(panel.field.name()) else {
            self.toast = Some(Toast::new("Nothing to copy yet", ToastKind::Info));
            return;
        };

        self.toast = Some(match copy_to_clipboard(url) {
            Ok(()) => Toast::new("URL copied", ToastKind::Info),
            Err(e) => {
                tracing::warn!("Clipboard copy failed: {:#}", e);
                Toast::error("Clipboard unavailable")
            }
        });
    }

    /// Status bar snapshot for the current frame
    pub fn status_bar(&self) -> StatusBar {
        StatusBar {
            hint: self.fields.get(self.focus).and_then(|p| p.focus_hint()),
            field_count: self.fields.len(),
            uploading: self
                .fields
                .iter()
                .filter(|p| p.field.is_uploading())
                .count(),
            uploader_ready: self.uploader.is_ready(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadConfig;
    use crate::upload::HttpUploader;
    use axum::extract::Multipart;
    use axum::routing::post;
    use axum::{Json, Router};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    /// Mock media endpoint: drains the multipart body, answers with a URL
    async fn spawn_endpoint() -> String {
        let router = Router::new().route(
            "/upload",
            post(|mut multipart: Multipart| async move {
                while let Ok(Some(field)) = multipart.next_field().await {
                    let _ = field.bytes().await;
                }
                Json(serde_json::json!({"url": "https://cdn.example/logo.png"}))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/upload", addr)
    }

    fn temp_image(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "imgfield-{}-{}-logo.png",
            tag,
            std::process::id()
        ));
        std::fs::write(&path, b"\x89PNG fake").unwrap();
        path
    }

    #[tokio::test]
    async fn test_studio_logo_scenario() {
        let endpoint = spawn_endpoint().await;
        let config = Config {
            upload: UploadConfig {
                endpoint_url: Some(endpoint),
                upload_preset: Some("studio_unsigned".to_string()),
                ..Default::default()
            },
            fields: vec![FieldSpec::new("logo", "Studio Logo")],
            ..Default::default()
        };
        let uploader: Arc<dyn MediaUploader> =
            Arc::new(HttpUploader::new(&config.upload).unwrap());
        let (mut app, mut outcomes) = App::new(&config, uploader, LogBuffer::new());
        let path = temp_image("scenario");

        assert_eq!(app.values.get("logo"), None);
        type_text(&mut app, &path.display().to_string());
        app.handle_key(key(KeyCode::Enter));
        assert!(app.fields[0].field.is_uploading());

        let outcome = outcomes.recv().await.unwrap();
        app.apply_outcome(outcome);

        assert_eq!(app.values.get("logo"), Some("https://cdn.example/logo.png"));
        assert!(!app.fields[0].field.is_uploading());
        assert_eq!(app.fields[0].field.status(), &FieldStatus::Idle);
        assert!(app
            .toast
            .as_ref()
            .is_some_and(|t| t.kind == ToastKind::Success));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_shows_error_and_keeps_value() {
        let mut config = Config::default();
        config.fields = vec![FieldSpec {
            name: "logo".to_string(),
            label: "Studio Logo".to_string(),
            value: Some("https://cdn.example/old.png".to_string()),
        }];
        let uploader = crate::upload::create_uploader(&config.upload);
        let (mut app, mut outcomes) = App::new(&config, uploader, LogBuffer::new());
        let path = temp_image("unconfigured");

        assert!(app.start_upload(0, path.clone()));
        app.apply_outcome(outcomes.recv().await.unwrap());

        assert!(matches!(
            app.fields[0].field.status(),
            FieldStatus::Failed { .. }
        ));
        assert_eq!(app.values.get("logo"), Some("https://cdn.example/old.png"));
        assert!(app
            .toast
            .as_ref()
            .is_some_and(|t| t.kind == ToastKind::Error));
        assert!(!app.status_bar().uploader_ready);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_focus_cycles_and_global_keys() {
        let config = Config {
            fields: vec![
                FieldSpec::new("logo", "Studio Logo"),
                FieldSpec::new("banner", "Banner"),
            ],
            ..Default::default()
        };
        let uploader = crate::upload::create_uploader(&config.upload);
        let (mut app, _outcomes) = App::new(&config, uploader, LogBuffer::new());

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focused_id(), ComponentId::Field(1));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, 0);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, 1);

        type_text(&mut app, "b.png");
        assert_eq!(app.fields[1].field.picker_text(), "b.png");
        assert_eq!(app.fields[0].field.picker_text(), "");

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_form_values_listener() {
        let mut values = FormValues::from_specs(&[FieldSpec::new("logo", "Studio Logo")]);
        assert_eq!(values.filled_count(), 0);

        values.on_change("https://cdn.example/logo.png", "logo");
        assert_eq!(values.get("logo"), Some("https://cdn.example/logo.png"));
        assert_eq!(values.filled_count(), 1);

        values.on_clear("logo");
        assert_eq!(values.get("logo"), None);
    }
}
