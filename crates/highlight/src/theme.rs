use crate::language::HighlightKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    pub foreground: Color,
    pub bold: bool,
}

impl HighlightStyle {
    pub const fn plain(foreground: Color) -> Self {
        Self {
            foreground,
            bold: false,
        }
    }

    pub const fn bold(foreground: Color) -> Self {
        Self {
            foreground,
            bold: true,
        }
    }
}

/// Style per highlight kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPalette {
    pub keyword: HighlightStyle,
    pub function: HighlightStyle,
    pub string: HighlightStyle,
    pub number: HighlightStyle,
    pub directive: HighlightStyle,
}

impl HighlightPalette {
    pub fn c_default() -> Self {
        Self {
            keyword: HighlightStyle::bold(Color::rgb(0xFF, 0x79, 0xC6)),
            function: HighlightStyle::bold(Color::rgb(0xFF, 0xD7, 0x00)),
            string: HighlightStyle::plain(Color::rgb(0xF1, 0xFA, 0x8C)),
            number: HighlightStyle::plain(Color::rgb(0xBD, 0x93, 0xF9)),
            directive: HighlightStyle::plain(Color::rgb(0x8B, 0xE9, 0xFD)),
        }
    }

    pub fn style_for(&self, kind: HighlightKind) -> &HighlightStyle {
        match kind {
            HighlightKind::Keyword => &self.keyword,
            HighlightKind::FunctionCall => &self.function,
            HighlightKind::String => &self.string,
            HighlightKind::Number => &self.number,
            HighlightKind::Directive => &self.directive,
        }
    }
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self::c_default()
    }
}
