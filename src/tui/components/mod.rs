// Components module - reusable UI building blocks
//
// - Field panel: one upload field (label, preview, status, path picker)
// - Logs panel: recent log lines
// - Status bar: key hints and form summary
// - Toast: transient upload notifications

pub mod field_panel;
pub mod formatters;
pub mod logs_panel;
pub mod status_bar;
pub mod toast;

pub use field_panel::{FieldPanel, FIELD_PANEL_HEIGHT};
pub use logs_panel::LogsPanel;
pub use status_bar::StatusBar;
pub use toast::{Toast, ToastKind};
