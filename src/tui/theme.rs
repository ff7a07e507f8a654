// Theme system for the TUI
//
// A handful of named palettes. Each theme defines colors for every element
// the form draws.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Resolved theme ready for use in the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ─── Terminal Colors ─────────────────────────────────────
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    // ─── UI Element Colors ───────────────────────────────────
    pub title: Color,
    pub border: Color,
    pub highlight: Color, // focused border, preview link
    pub status_bar: Color,

    // ─── Field Status Colors ─────────────────────────────────
    pub uploading: Color,
    pub uploaded: Color,
    pub error: Color,
    pub warn: Color,

    pub border_type: BorderType,
}

impl Theme {
    /// Theme names accepted by `by_name`
    pub const NAMES: [&'static str; 3] = ["dark", "light", "nord"];

    /// Load theme by name, falling back to dark
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "nord" => Self::nord(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(
                    "Unknown theme '{}' (expected one of {:?}), using dark",
                    other,
                    Self::NAMES
                );
                Self::dark()
            }
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color::Rgb(0x1e, 0x1e, 0x2e),
            foreground: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x6c, 0x70, 0x86),
            title: Color::Rgb(0x89, 0xb4, 0xfa),
            border: Color::Rgb(0x45, 0x47, 0x5a),
            highlight: Color::Rgb(0xf5, 0xc2, 0xe7),
            status_bar: Color::Rgb(0xa6, 0xad, 0xc8),
            uploading: Color::Rgb(0xf9, 0xe2, 0xaf),
            uploaded: Color::Rgb(0xa6, 0xe3, 0xa1),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
            warn: Color::Rgb(0xfa, 0xb3, 0x87),
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color::Rgb(0xef, 0xf1, 0xf5),
            foreground: Color::Rgb(0x4c, 0x4f, 0x69),
            muted: Color::Rgb(0x9c, 0xa0, 0xb0),
            title: Color::Rgb(0x1e, 0x66, 0xf5),
            border: Color::Rgb(0xbc, 0xc0, 0xcc),
            highlight: Color::Rgb(0x88, 0x39, 0xef),
            status_bar: Color::Rgb(0x5c, 0x5f, 0x77),
            uploading: Color::Rgb(0xdf, 0x8e, 0x1d),
            uploaded: Color::Rgb(0x40, 0xa0, 0x2b),
            error: Color::Rgb(0xd2, 0x0f, 0x39),
            warn: Color::Rgb(0xfe, 0x64, 0x0b),
            border_type: BorderType::Plain,
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            background: Color::Rgb(0x2e, 0x34, 0x40),
            foreground: Color::Rgb(0xd8, 0xde, 0xe9),
            muted: Color::Rgb(0x4c, 0x56, 0x6a),
            title: Color::Rgb(0x88, 0xc0, 0xd0),
            border: Color::Rgb(0x43, 0x4c, 0x5e),
            highlight: Color::Rgb(0x81, 0xa1, 0xc1),
            status_bar: Color::Rgb(0xe5, 0xe9, 0xf0),
            uploading: Color::Rgb(0xeb, 0xcb, 0x8b),
            uploaded: Color::Rgb(0xa3, 0xbe, 0x8c),
            error: Color::Rgb(0xbf, 0x61, 0x6a),
            warn: Color::Rgb(0xd0, 0x87, 0x70),
            border_type: BorderType::Rounded,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
