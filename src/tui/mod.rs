// TUI module - Terminal User Interface
//
// This module manages the upload form using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, upload outcomes)
// - Rendering the UI

pub mod app;
pub mod clipboard;
pub mod components;
pub mod theme;
pub mod traits;
pub mod ui;

use crate::config::Config;
use crate::field::UploadOutcome;
use crate::logging::LogBuffer;
use crate::upload::MediaUploader;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the upload form
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, also when the loop fails.
pub async fn run_form(
    config: Config,
    log_buffer: LogBuffer,
    uploader: Arc<dyn MediaUploader>,
) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (mut app, mut outcome_rx) = App::new(&config, uploader, log_buffer);
    tracing::info!(
        "Form ready with {} field(s), theme {}",
        app.fields.len(),
        app.theme.name
    );

    let result = run_event_loop(&mut terminal, &mut app, &mut outcome_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources and reacts to whichever completes first:
/// 1. Keyboard input (editing, focus, selection)
/// 2. Timer ticks (spinner animation, toast expiry)
/// 3. Upload outcomes from spawned upload tasks
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    outcome_rx: &mut mpsc::Receiver<UploadOutcome>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        app.handle_key(key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(outcome) = outcome_rx.recv() => {
                app.apply_outcome(outcome);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
