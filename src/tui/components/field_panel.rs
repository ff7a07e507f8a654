//! Upload field panel
//!
//! Wraps an `UploadField` as a TUI component. The field decides *what* is
//! visible (its render plan); this panel decides how each element looks and
//! turns keys into picker edits and selections.
//!
//! A terminal has no file dialog, so the picker is a path input: type a
//! path, press Enter to select it.

use super::formatters::truncate_to_width;
use crate::field::{Element, UploadField, UPLOADED_MESSAGE, UPLOADING_MESSAGE};
use crate::tui::traits::{Component, ComponentId, Handled, Interactive, RenderContext};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::PathBuf;

/// Rows a field panel needs: borders plus the tallest render plan
pub const FIELD_PANEL_HEIGHT: u16 = 7;

/// A form field panel
pub struct FieldPanel {
    index: usize,
    pub field: UploadField,
    /// Path selected with Enter, waiting for the form to start the upload
    submitted: Option<PathBuf>,
}

impl FieldPanel {
    pub fn new(index: usize, field: UploadField) -> Self {
        Self {
            index,
            field,
            submitted: None,
        }
    }

    /// Take the path the user just selected, if any
    pub fn take_submission(&mut self) -> Option<PathBuf> {
        self.submitted.take()
    }

    /// Build display lines for the field's render plan
    pub fn lines(&self, ctx: &RenderContext, width: usize) -> Vec<Line<'static>> {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let value = ctx.values.get(self.field.name());

        self.field
            .view(value)
            .into_iter()
            .filter_map(|element| match element {
                // Label goes in the border title
                Element::Label(_) => None,
                Element::UploadingMessage => Some(Line::from(Span::styled(
                    format!("{} {}", ctx.spinner_char(), UPLOADING_MESSAGE),
                    Style::default().fg(theme.uploading),
                ))),
                Element::Preview { src } => Some(Line::from(vec![
                    Span::styled("🖼  ", Style::default().fg(theme.muted)),
                    Span::styled(
                        truncate_to_width(&src, width.saturating_sub(3)),
                        Style::default()
                            .fg(theme.highlight)
                            .add_modifier(Modifier::UNDERLINED),
                    ),
                ])),
                Element::UploadedMessage => Some(Line::from(Span::styled(
                    format!("✓ {}", UPLOADED_MESSAGE),
                    Style::default().fg(theme.uploaded),
                ))),
                Element::ErrorMessage(message) => Some(Line::from(Span::styled(
                    truncate_to_width(&format!("✗ {}", message), width),
                    Style::default().fg(theme.error),
                ))),
                Element::FilePicker => Some(self.picker_line(ctx, focused, width)),
            })
            .collect()
    }

    fn picker_line(&self, ctx: &RenderContext, focused: bool, width: usize) -> Line<'static> {
        let theme = ctx.theme;
        let text = self.field.picker_text();

        if text.is_empty() && !focused {
            return Line::from(Span::styled(
                "📁 type a file path, Enter to upload",
                Style::default().fg(theme.muted),
            ));
        }

        let cursor = if focused { "▏" } else { "" };
        // Keep the end of long paths visible while typing
        let room = width.saturating_sub(4);
        let shown: String = if text.chars().count() > room {
            let skip = text.chars().count() - room;
            text.chars().skip(skip).collect()
        } else {
            text.to_string()
        };

        Line::from(vec![
            Span::styled("📁 ", Style::default().fg(theme.muted)),
            Span::styled(shown, Style::default().fg(theme.foreground)),
            Span::styled(cursor, Style::default().fg(theme.highlight)),
        ])
    }
}

impl Component for FieldPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Field(self.index)
    }

    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let focused = ctx.is_focused(self.id());
        let border_color = if focused { theme.highlight } else { theme.border };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {} ", self.field.label_text()),
                Style::default()
                    .fg(theme.title)
                    .add_modifier(Modifier::BOLD),
            ));

        let inner_width = area.width.saturating_sub(2) as usize;
        let paragraph = Paragraph::new(self.lines(ctx, inner_width))
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(paragraph, area);
    }
}

impl Interactive for FieldPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        // Picker is hidden while uploading
        if self.field.is_uploading() {
            return Handled::No;
        }

        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.field.push_picker_char(c);
                Handled::Yes
            }
            KeyCode::Backspace => {
                self.field.pop_picker_char();
                Handled::Yes
            }
            KeyCode::Enter => {
                self.submitted = self.field.take_picker_path();
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        if self.field.is_uploading() {
            Some("uploading…")
        } else {
            Some("type path  Enter:upload")
        }
    }
}
