//! Core component trait - the foundation of the UI system
//!
//! Every UI element that can be rendered implements `Component`.
//! This trait provides identity and rendering capability.

use crate::tui::app::FormValues;
use crate::tui::theme::Theme;
use ratatui::{layout::Rect, Frame};

/// Unique identifier for a component
///
/// Used for focus tracking (which component receives input) and for
/// routing upload outcomes back to the right field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    /// Upload field at this position in the form
    Field(usize),
    /// Recent log lines (non-focusable)
    Logs,
    /// Key hints and form summary (non-focusable)
    StatusBar,
}

/// Immutable context passed to components during rendering
///
/// Components only see what they need: no access to mutable form state.
/// Field values live here because the form owns them; a field reads its
/// own value as a render prop.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Color theme for styling
    pub theme: &'a Theme,

    /// Which component currently has focus
    pub focus: ComponentId,

    /// Animation frame counter (for spinners)
    pub animation_frame: usize,

    /// Current form values, by field name
    pub values: &'a FormValues,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        theme: &'a Theme,
        focus: ComponentId,
        animation_frame: usize,
        values: &'a FormValues,
    ) -> Self {
        Self {
            theme,
            focus,
            animation_frame,
            values,
        }
    }

    /// Check if a component is currently focused
    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.focus == id
    }

    /// Get spinner character for current animation frame
    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
        SPINNER[self.animation_frame % SPINNER.len()]
    }
}

/// Base trait for all UI components
///
/// A component is anything that can render itself to the terminal.
/// Components that take keyboard input also implement `Interactive`.
pub trait Component {
    /// Unique identifier for this component
    fn id(&self) -> ComponentId;

    /// Render the component to the given area
    ///
    /// # Arguments
    ///
    /// * `f` - The frame to render to
    /// * `area` - The rectangular area allocated for this component
    /// * `ctx` - Immutable render context (theme, focus, values)
    fn render(&self, f: &mut Frame, area: Rect, ctx: &RenderContext);
}
