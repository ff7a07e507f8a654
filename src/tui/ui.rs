// UI rendering logic
//
// Lays out the form: one panel per field, the recent logs strip and the
// status bar, with the toast drawn on top of everything.

use super::app::App;
use super::components::FIELD_PANEL_HEIGHT;
use super::traits::{Component, RenderContext};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

/// Height of the logs strip
const LOGS_HEIGHT: u16 = 6;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let ctx = RenderContext::new(
        &app.theme,
        app.focused_id(),
        app.animation_frame(),
        &app.values,
    );

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        f.area(),
    );

    // - Fields (fixed height each, spare rows absorbed below them)
    // - System logs (fixed)
    // - Status bar (2 lines: border + text)
    let mut constraints: Vec<Constraint> = app
        .fields
        .iter()
        .map(|_| Constraint::Length(FIELD_PANEL_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(LOGS_HEIGHT));
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    for (panel, area) in app.fields.iter().zip(chunks.iter()) {
        panel.render(f, *area, &ctx);
    }

    let n = chunks.len();
    app.logs.render(f, chunks[n - 2], &ctx);
    app.status_bar().render(f, chunks[n - 1], &ctx);

    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::logging::LogBuffer;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_draws_form_with_default_field() {
        let config = Config::default();
        let uploader = crate::upload::create_uploader(&config.upload);
        let (app, _outcomes) = App::new(&config, uploader, LogBuffer::new());

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Studio Logo"));
        assert!(screen.contains("endpoint not configured"));
    }
}
