use std::ops::Range;

use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId};
use zenith_highlight::{Color, HighlightKind, HighlightPalette, StyledRun};

pub fn color32_from_color(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Colors and font used to lay out the code editor.
#[derive(Debug, Clone)]
pub struct EditorStyle {
    pub font: FontId,
    pub text: Color32,
    pub search_background: Color32,
    pub current_background: Color32,
    pub syntax: HighlightPalette,
}

impl EditorStyle {
    fn format(&self, kind: Option<HighlightKind>, mark: Mark) -> TextFormat {
        let color = kind
            .map(|kind| color32_from_color(self.syntax.style_for(kind).foreground))
            .unwrap_or(self.text);
        let background = match mark {
            Mark::None => Color32::TRANSPARENT,
            Mark::Match => self.search_background,
            Mark::Current => self.current_background,
        };
        TextFormat {
            font_id: self.font.clone(),
            color,
            background,
            ..Default::default()
        }
    }
}

/// Seconds a button must be held before it counts as a long press.
pub const LONG_PRESS_SECS: f64 = 0.6;

/// Tracks a held pointer on one button. Fires once per press, and the click
/// reported on release of a fired press is swallowed.
#[derive(Debug, Default)]
pub struct LongPress {
    pressed_at: Option<f64>,
    fired: bool,
}

impl LongPress {
    /// Feeds this frame's pointer state. Returns true on the frame the hold
    /// crosses [`LONG_PRESS_SECS`].
    pub fn update(&mut self, held: bool, now: f64) -> bool {
        if !held {
            if self.pressed_at.take().is_none() {
                self.fired = false;
            }
            return false;
        }
        let started = *self.pressed_at.get_or_insert(now);
        if !self.fired && now - started >= LONG_PRESS_SECS {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn is_held(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Whether the click that ends the current press should be ignored.
    pub fn swallow_click(&mut self) -> bool {
        std::mem::take(&mut self.fired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Match,
    Current,
}

/// Builds the galley job for `text`: syntax colors from `runs`, with search
/// `marks` painted as a background on top. The `current` match gets its own
/// background.
///
/// `runs` and `marks` are byte ranges sorted by start. Range ends that fall
/// inside a multi-byte char are ignored, so stale ranges never split text.
pub fn layout_job(
    text: &str,
    runs: &[StyledRun],
    marks: &[Range<usize>],
    current: Option<&Range<usize>>,
    style: &EditorStyle,
) -> LayoutJob {
    let mut cuts: Vec<usize> = Vec::with_capacity(2 + 2 * (runs.len() + marks.len()));
    cuts.push(0);
    cuts.push(text.len());
    for range in runs
        .iter()
        .map(|run| &run.range)
        .chain(marks.iter())
        .chain(current)
    {
        cuts.push(range.start.min(text.len()));
        cuts.push(range.end.min(text.len()));
    }
    // Ranges computed for an older buffer can split a multi-byte char.
    cuts.retain(|&cut| text.is_char_boundary(cut));
    cuts.sort_unstable();
    cuts.dedup();

    let mut job = LayoutJob::default();
    let mut run_index = 0;
    let mut mark_index = 0;
    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);
        while run_index < runs.len() && runs[run_index].range.end <= start {
            run_index += 1;
        }
        while mark_index < marks.len() && marks[mark_index].end <= start {
            mark_index += 1;
        }
        let kind = runs
            .get(run_index)
            .filter(|run| run.range.start <= start)
            .map(|run| run.kind);
        let mark = if current.is_some_and(|range| range.start <= start && start < range.end) {
            Mark::Current
        } else if marks
            .get(mark_index)
            .is_some_and(|mark| mark.start <= start)
        {
            Mark::Match
        } else {
            Mark::None
        };
        job.append(&text[start..end], 0.0, style.format(kind, mark));
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_highlight::Highlighter;

    fn style() -> EditorStyle {
        EditorStyle {
            font: FontId::monospace(14.0),
            text: Color32::WHITE,
            search_background: Color32::YELLOW,
            current_background: Color32::GOLD,
            syntax: HighlightPalette::c_default(),
        }
    }

    fn sections(job: &LayoutJob) -> Vec<(&str, Color32, Color32)> {
        job.sections
            .iter()
            .map(|section| {
                (
                    &job.text[section.byte_range.clone()],
                    section.format.color,
                    section.format.background,
                )
            })
            .collect()
    }

    #[test]
    fn keywords_take_palette_color() {
        let text = "int x;";
        let runs = Highlighter::c_language().resolve_document(text);
        let job = layout_job(text, &runs, &[], None, &style());
        let keyword = color32_from_color(HighlightPalette::c_default().keyword.foreground);
        assert_eq!(job.text, text);
        assert_eq!(
            sections(&job),
            vec![
                ("int", keyword, Color32::TRANSPARENT),
                (" x;", Color32::WHITE, Color32::TRANSPARENT),
            ]
        );
    }

    #[test]
    fn search_marks_split_runs() {
        let text = "return 0;";
        let runs = Highlighter::c_language().resolve_document(text);
        let job = layout_job(text, &runs, &[3..8], None, &style());
        let keyword = color32_from_color(HighlightPalette::c_default().keyword.foreground);
        let number = color32_from_color(HighlightPalette::c_default().number.foreground);
        assert_eq!(
            sections(&job),
            vec![
                ("ret", keyword, Color32::TRANSPARENT),
                ("urn", keyword, Color32::YELLOW),
                (" ", Color32::WHITE, Color32::YELLOW),
                ("0", number, Color32::YELLOW),
                (";", Color32::WHITE, Color32::TRANSPARENT),
            ]
        );
    }

    #[test]
    fn current_match_stands_out() {
        let text = "ab ab ab";
        let marks = [0..2, 3..5, 6..8];
        let job = layout_job(text, &[], &marks, Some(&(3..5)), &style());
        let backgrounds: Vec<Color32> = sections(&job).iter().map(|s| s.2).collect();
        assert_eq!(
            backgrounds,
            vec![
                Color32::YELLOW,
                Color32::TRANSPARENT,
                Color32::GOLD,
                Color32::TRANSPARENT,
                Color32::YELLOW,
            ]
        );
    }

    #[test]
    fn stale_current_match_inside_multibyte_char_is_ignored() {
        // "€" is three bytes; a match recorded for "ab ab" now ends inside it.
        let text = "€ab ab";
        let marks = [3..5, 6..8];
        let job = layout_job(text, &[], &marks, Some(&(0..2)), &style());
        assert_eq!(job.text, text);
        let covered: usize = job.sections.iter().map(|s| s.byte_range.len()).sum();
        assert_eq!(covered, text.len());
        assert!(job.sections.iter().all(|s| {
            text.is_char_boundary(s.byte_range.start) && text.is_char_boundary(s.byte_range.end)
        }));
        assert_eq!(sections(&job)[0].0, "€");
    }

    #[test]
    fn long_press_fires_once_and_swallows_the_release_click() {
        let mut press = LongPress::default();
        assert!(!press.update(true, 10.0));
        assert!(press.is_held());
        assert!(!press.update(true, 10.3));
        assert!(press.update(true, 10.6));
        assert!(!press.update(true, 11.5));
        assert!(!press.update(false, 11.6));
        assert!(press.swallow_click());
        assert!(!press.update(false, 11.7));
        assert!(!press.is_held());
    }

    #[test]
    fn short_press_keeps_its_click() {
        let mut press = LongPress::default();
        assert!(!press.update(true, 1.0));
        assert!(!press.update(true, 1.2));
        assert!(!press.update(false, 1.3));
        assert!(!press.swallow_click());
    }

    #[test]
    fn long_press_released_off_the_button_resets() {
        let mut press = LongPress::default();
        press.update(true, 0.0);
        assert!(press.update(true, 1.0));
        press.update(false, 1.1);
        press.update(false, 1.2);
        assert!(!press.swallow_click());
        assert!(!press.update(true, 2.0));
    }

    #[test]
    fn plain_text_is_one_section() {
        let job = layout_job("hello there", &[], &[], None, &style());
        assert_eq!(job.sections.len(), 1);
        assert_eq!(job.sections[0].byte_range, 0..11);
    }

    #[test]
    fn multi_line_offsets_line_up() {
        let text = "#include <stdio.h>\nint main(){}";
        let runs = Highlighter::c_language().resolve_document(text);
        let job = layout_job(text, &runs, &[], None, &style());
        let covered: usize = job.sections.iter().map(|s| s.byte_range.len()).sum();
        assert_eq!(covered, text.len());
        let directive = color32_from_color(HighlightPalette::c_default().directive.foreground);
        assert_eq!(sections(&job)[0].1, directive);
    }
}
