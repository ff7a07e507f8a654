//! Logs panel component
//!
//! Shows the newest entries from the shared log buffer, color-coded by
//! severity. The buffer is shared with the tracing layer; the panel only
//! reads from it.

use crate::logging::{LogBuffer, LogEntry, LogLevel};
use crate::tui::theme::Theme;
use crate::tui::traits::{Component, ComponentId, RenderContext};
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Logs panel component
pub struct LogsPanel {
    buffer: LogBuffer,
}

impl LogsPanel {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl Component for LogsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Logs
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let visible = area.height.saturating_sub(2) as usize;

        let items: Vec<ListItem> = self
            .buffer
            .recent(visible)
            .iter()
            .map(|entry| ListItem::new(format_log_entry(entry)).style(log_level_style(&entry.level, theme)))
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border))
                .title(" Logs "),
        );

        f.render_widget(list, area);
    }
}

/// Format a log entry as a single line
pub fn format_log_entry(entry: &LogEntry) -> String {
    format!(
        "{} {:5} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

fn log_level_style(level: &LogLevel, theme: &Theme) -> Style {
    match level {
        LogLevel::Error => Style::default().fg(theme.error),
        LogLevel::Warn => Style::default().fg(theme.warn),
        LogLevel::Info => Style::default().fg(theme.foreground),
        LogLevel::Debug | LogLevel::Trace => Style::default().fg(theme.muted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_log_entry() {
        let entry = LogEntry {
            timestamp: chrono::Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 5).unwrap(),
            level: LogLevel::Warn,
            target: "imgfield::field".to_string(),
            message: "Upload for 'logo' failed".to_string(),
        };
        assert_eq!(
            format_log_entry(&entry),
            "09:30:05 WARN  Upload for 'logo' failed"
        );
    }
}
