use std::fmt;

use serde::{Deserialize, Serialize};
use zenith_highlight::Color;

/// UI color theme persisted in `data/settings.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Purple,
    Dark,
}

impl ThemeName {
    pub const ALL: [ThemeName; 2] = [ThemeName::Purple, ThemeName::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Purple => "purple",
            ThemeName::Dark => "dark",
        }
    }

    /// Label shown in the settings dialog.
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Purple => "Purple (default)",
            ThemeName::Dark => "Dark",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete colors for every themed surface of the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub window_background: Color,
    pub window_text: Color,
    pub panel_background: Color,
    pub editor_background: Color,
    pub editor_text: Color,
    pub terminal_background: Color,
    pub terminal_text: Color,
    pub accent: Color,
    pub accent_hover: Color,
    pub search_match: Color,
}

const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
const TERMINAL_BACKGROUND: Color = Color::rgb(0x00, 0x00, 0x00);
const TERMINAL_TEXT: Color = Color::rgb(0x00, 0xFF, 0x00);
const ACCENT: Color = Color::rgb(0x62, 0x00, 0xEE);
const ACCENT_HOVER: Color = Color::rgb(0x37, 0x00, 0xB3);
const SEARCH_MATCH: Color = Color::rgb(0xFF, 0xFF, 0x00);

impl ThemePalette {
    pub const fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Purple => Self {
                window_background: Color::rgb(0x1F, 0x00, 0x1F),
                window_text: WHITE,
                panel_background: Color::rgb(0x2C, 0x00, 0x32),
                editor_background: Color::rgb(0x2C, 0x00, 0x32),
                editor_text: Color::rgb(0xE0, 0xE0, 0xE0),
                terminal_background: TERMINAL_BACKGROUND,
                terminal_text: TERMINAL_TEXT,
                accent: ACCENT,
                accent_hover: ACCENT_HOVER,
                search_match: SEARCH_MATCH,
            },
            ThemeName::Dark => Self {
                window_background: Color::rgb(0x12, 0x12, 0x12),
                window_text: WHITE,
                panel_background: Color::rgb(0x1E, 0x1E, 0x1E),
                editor_background: Color::rgb(0x1E, 0x1E, 0x1E),
                editor_text: Color::rgb(0xC0, 0xC0, 0xC0),
                terminal_background: TERMINAL_BACKGROUND,
                terminal_text: TERMINAL_TEXT,
                accent: ACCENT,
                accent_hover: ACCENT_HOVER,
                search_match: SEARCH_MATCH,
            },
        }
    }
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self::for_theme(ThemeName::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_differ_where_themes_differ() {
        let purple = ThemePalette::for_theme(ThemeName::Purple);
        let dark = ThemePalette::for_theme(ThemeName::Dark);
        assert_eq!(purple.editor_background, Color::rgb(0x2C, 0x00, 0x32));
        assert_eq!(dark.window_background, Color::rgb(0x12, 0x12, 0x12));
        assert_ne!(purple.editor_text, dark.editor_text);
        assert_eq!(purple.terminal_text, dark.terminal_text);
        assert_eq!(ThemePalette::default(), purple);
    }
}
