//! Clipboard helper for copying uploaded URLs
//!
//! Uses `arboard` for cross-platform support. The clipboard is opened per
//! copy so nothing is held while the form is idle.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy text to the system clipboard
///
/// Common failure cases: no display server (headless Linux), permission denied.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Failed to access clipboard")?
        .set_text(text)
        .context("Failed to set clipboard text")
}
