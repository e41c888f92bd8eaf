mod language;
mod theme;

pub use language::{
    builtin, HighlightError, HighlightKind, HighlightRule, HighlightToken, Highlighter, StyledRun,
};
pub use theme::{Color, HighlightPalette, HighlightStyle};
