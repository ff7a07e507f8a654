// Status bar component
//
// Renders key hints for the focused field and a short form summary at the
// bottom of the screen. The endpoint state sits at the right edge and keeps
// its width on narrow terminals; the hints are truncated instead.

use super::formatters::truncate_to_width;
use crate::tui::traits::{Component, ComponentId, RenderContext};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Status bar with key hints and form summary
pub struct StatusBar {
    /// Hint from the focused component
    pub hint: Option<&'static str>,
    /// Fields in the form
    pub field_count: usize,
    /// Fields currently uploading
    pub uploading: usize,
    /// Whether the uploader can reach a configured endpoint
    pub uploader_ready: bool,
}

impl StatusBar {
    /// Key hints and value summary, left side
    pub fn text(&self, ctx: &RenderContext) -> String {
        let filled = ctx.values.filled_count();
        let hint = self.hint.unwrap_or("");

        let uploading = if self.uploading > 0 {
            format!(" │ {} {} uploading", ctx.spinner_char(), self.uploading)
        } else {
            String::new()
        };

        format!(
            " {} │ Tab:next ^Y:copy Esc:quit │ {}/{} set{}",
            hint, filled, self.field_count, uploading
        )
    }

    /// Endpoint state, right side
    pub fn endpoint_text(&self) -> &'static str {
        if self.uploader_ready {
            "endpoint ✓ "
        } else {
            "endpoint not configured "
        }
    }
}

impl Component for StatusBar {
    fn id(&self) -> ComponentId {
        ComponentId::StatusBar
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let endpoint = self.endpoint_text();
        let endpoint_width = (endpoint.width() as u16).min(inner.width);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(endpoint_width)])
            .split(inner);

        let left = truncate_to_width(&self.text(ctx), chunks[0].width as usize);
        f.render_widget(
            Paragraph::new(left).style(Style::default().fg(ctx.theme.status_bar)),
            chunks[0],
        );

        let endpoint_color = if self.uploader_ready {
            ctx.theme.status_bar
        } else {
            ctx.theme.warn
        };
        f.render_widget(
            Paragraph::new(endpoint)
                .alignment(Alignment::Right)
                .style(Style::default().fg(endpoint_color)),
            chunks[1],
        );
    }
}
