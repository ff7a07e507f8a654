//! Interactive trait for components that handle keyboard input
//!
//! The form routes keys it does not handle globally to the focused
//! component.

use super::Component;
use crossterm::event::KeyEvent;

/// Result of handling a key event
///
/// Tells the form whether the component consumed the event or if it should
/// bubble up for global handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event was consumed by the component
    Yes,
    /// Event was not handled, should bubble up
    No,
}

/// Trait for components that handle keyboard input
///
/// # Event Flow
///
/// ```text
/// KeyEvent
///    │
///    ▼
/// Form (global: Esc, Ctrl+C, Tab, Ctrl+Y)
///    │
///    │ if not handled
///    ▼
/// Focused component (via Interactive)
///    │
///    │ returns Handled::Yes or Handled::No
///    ▼
/// Form (ignores the rest)
/// ```
pub trait Interactive: Component {
    /// Handle a key event
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Hint text for the status bar when this component is focused
    fn focus_hint(&self) -> Option<&'static str> {
        None
    }
}
