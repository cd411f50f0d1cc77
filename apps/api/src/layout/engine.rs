//! Paginated text layout: draws an ordered list of handout lines onto a
//! fixed-size page canvas.
//!
//! # Algorithm
//! - Each line is classified (`style::classify`) into a style record that fixes
//!   its weight, size, line height and indent. Blank lines only move the cursor.
//! - A line wider than the available width is wrapped greedily one grapheme at a
//!   time. Wrapping is not word-aware: handout text is Chinese, which has no
//!   spaces to break on.
//! - Before every drawn line or fragment, a cursor below the bottom margin
//!   triggers a page break: new page, caller's decoration, cursor back to top.
//!
//! A single grapheme wider than the available width is still drawn on its own
//! line and overflows the right margin.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::layout::canvas::Canvas;
use crate::layout::fonts::FontTable;
use crate::layout::style::{classify, LineKind, LineStyle, StyleSheet};

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 595.2756,
        height: 841.8898,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Distances from the page edges, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for Margins {
    /// Generous top margin leaves room for the logo.
    fn default() -> Self {
        Self {
            top: 150.0,
            left: 60.0,
            right: 60.0,
            bottom: 80.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page: PageSize,
    pub margins: Margins,
    pub styles: StyleSheet,
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutConfigError {
    #[error("margins leave no horizontal room ({0}pt content width)")]
    NoContentWidth(f32),

    #[error("top margin ({top}) must stay above bottom margin ({bottom})")]
    NoContentHeight { top: f32, bottom: f32 },

    #[error("line heights and spacer must be positive")]
    NonPositiveAdvance,

    #[error("indent {indent}pt leaves no room in {content_width}pt content width")]
    NoStyleWidth { indent: f32, content_width: f32 },
}

impl LayoutConfig {
    /// Baseline of the first line on every page.
    pub fn top_y(&self) -> f32 {
        self.page.height - self.margins.top
    }

    pub fn content_width(&self) -> f32 {
        self.page.width - self.margins.left - self.margins.right
    }

    pub fn available_width(&self, style: &LineStyle) -> f32 {
        self.content_width() - style.extra_indent
    }

    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        let content_width = self.content_width();
        if content_width <= 0.0 {
            return Err(LayoutConfigError::NoContentWidth(content_width));
        }
        if self.top_y() <= self.margins.bottom {
            return Err(LayoutConfigError::NoContentHeight {
                top: self.top_y(),
                bottom: self.margins.bottom,
            });
        }
        let styles = &self.styles;
        let advances = [
            styles.heading.line_height,
            styles.sub_heading.line_height,
            styles.numbered_item.line_height,
            styles.body.line_height,
            styles.blank_spacer,
        ];
        if advances.iter().any(|a| *a <= 0.0) {
            return Err(LayoutConfigError::NonPositiveAdvance);
        }
        let line_styles = [
            &styles.heading,
            &styles.sub_heading,
            &styles.numbered_item,
            &styles.body,
        ];
        if let Some(style) = line_styles.iter().find(|s| s.extra_indent >= content_width) {
            return Err(LayoutConfigError::NoStyleWidth {
                indent: style.extra_indent,
                content_width,
            });
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorState {
    /// Fresh page, nothing drawn yet.
    AtTop,
    InPage,
    /// Below the bottom margin; the next draw must break first.
    NeedsBreak,
}

/// Vertical drawing position on the current page.
#[derive(Debug, Clone, Copy)]
pub struct PageCursor {
    y: f32,
    top: f32,
    bottom: f32,
}

impl PageCursor {
    pub fn new(config: &LayoutConfig) -> Self {
        let top = config.top_y();
        Self {
            y: top,
            top,
            bottom: config.margins.bottom,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn state(&self) -> CursorState {
        if self.y < self.bottom {
            CursorState::NeedsBreak
        } else if self.y == self.top {
            CursorState::AtTop
        } else {
            CursorState::InPage
        }
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    fn reset(&mut self) {
        self.y = self.top;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Splits `line` into fragments no wider than `available`.
///
/// A line that fits is returned whole. Otherwise graphemes are appended one at
/// a time; when the next one would overflow, the accumulated fragment is
/// flushed and a new one starts with that grapheme. A fragment is never empty,
/// so an over-wide grapheme becomes a fragment of its own.
pub fn wrap_fragments<F>(line: &str, available: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    if measure(line) <= available {
        return vec![line.to_string()];
    }

    let mut fragments = Vec::new();
    let mut current = String::new();
    for grapheme in line.graphemes(true) {
        let prior_len = current.len();
        current.push_str(grapheme);
        if prior_len > 0 && measure(&current) > available {
            current.truncate(prior_len);
            fragments.push(std::mem::replace(&mut current, grapheme.to_string()));
        }
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}

// ────────────────────────────────────────────────────────────────────────────
// Layout pass
// ────────────────────────────────────────────────────────────────────────────

/// Summary of one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOutcome {
    /// Cursor position after the last line.
    pub final_cursor: f32,
    pub final_state: CursorState,
    /// Drawn lines, counting each wrap fragment separately.
    pub lines_drawn: u32,
    pub page_breaks: u32,
}

/// Draws `lines` onto `canvas`, starting at the top of the current page.
///
/// `decorate` runs right after every page break this pass performs (the caller
/// decorates the first page itself). The font is re-applied after each break
/// because a fresh page starts with a fresh graphics state.
pub fn layout_lines<C, S, D>(
    canvas: &mut C,
    lines: &[S],
    config: &LayoutConfig,
    fonts: &FontTable,
    mut decorate: D,
) -> LayoutOutcome
where
    C: Canvas + ?Sized,
    S: AsRef<str>,
    D: FnMut(&mut C),
{
    let styles = &config.styles;
    let mut cursor = PageCursor::new(config);
    let mut lines_drawn = 0u32;
    let mut page_breaks = 0u32;

    for line in lines {
        let line = line.as_ref();
        let class = match classify(line, styles) {
            LineKind::Blank => {
                cursor.advance(styles.blank_spacer);
                continue;
            }
            LineKind::Styled(class) => class,
        };

        let style = styles.style(class);
        let font = fonts.family(style.weight);
        let x = config.margins.left + style.extra_indent;
        let available = config.available_width(style);
        canvas.set_font(font, style.size);

        let fragments = wrap_fragments(line, available, |s| {
            canvas.measure_width(s, font, style.size)
        });
        if fragments.len() > 1 {
            debug!(?class, fragments = fragments.len(), "Wrapped line");
        }

        for fragment in &fragments {
            if cursor.state() == CursorState::NeedsBreak {
                canvas.start_new_page();
                decorate(canvas);
                canvas.set_font(font, style.size);
                cursor.reset();
                page_breaks += 1;
            }
            canvas.draw_text(x, cursor.y(), fragment);
            cursor.advance(style.line_height);
            lines_drawn += 1;
        }
    }

    LayoutOutcome {
        final_cursor: cursor.y(),
        final_state: cursor.state(),
        lines_drawn,
        page_breaks,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::{DrawCommand, RecordingCanvas};
    use crate::layout::font_metrics::FontFamily;
    use crate::layout::style::{FontWeight, StyleClass};
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Font(FontFamily, f32),
        Text { x: f32, y: f32, text: String },
        NewPage,
        Decorated,
    }

    /// Every character is `per_char` points wide, whatever the font.
    struct FixedWidthCanvas {
        per_char: f32,
        events: Vec<Event>,
        measurements: Cell<u32>,
    }

    impl FixedWidthCanvas {
        fn new(per_char: f32) -> Self {
            Self {
                per_char,
                events: Vec::new(),
                measurements: Cell::new(0),
            }
        }

        fn texts(&self) -> Vec<(f32, f32, String)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Text { x, y, text } => Some((*x, *y, text.clone())),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, wanted: &Event) -> usize {
            self.events.iter().filter(|e| *e == wanted).count()
        }
    }

    impl Canvas for FixedWidthCanvas {
        fn set_font(&mut self, font: FontFamily, size: f32) {
            self.events.push(Event::Font(font, size));
        }

        fn measure_width(&self, text: &str, _font: FontFamily, _size: f32) -> f32 {
            self.measurements.set(self.measurements.get() + 1);
            text.chars().count() as f32 * self.per_char
        }

        fn draw_text(&mut self, x: f32, y: f32, text: &str) {
            self.events.push(Event::Text {
                x,
                y,
                text: text.to_string(),
            });
        }

        fn start_new_page(&mut self) {
            self.events.push(Event::NewPage);
        }
    }

    /// Page with 300pt of content width; body lines indented by `extra_indent`.
    fn body_only_config(extra_indent: f32) -> LayoutConfig {
        let mut config = LayoutConfig {
            page: PageSize {
                width: 420.0,
                height: 842.0,
            },
            ..LayoutConfig::default()
        };
        config.styles.body.extra_indent = extra_indent;
        config
    }

    fn decorate(canvas: &mut FixedWidthCanvas) {
        canvas.events.push(Event::Decorated);
    }

    // ── wrap_fragments ──────────────────────────────────────────────────────

    fn twenty_per_char(s: &str) -> f32 {
        s.chars().count() as f32 * 20.0
    }

    #[test]
    fn test_wrap_line_that_fits_is_single_fragment() {
        let fragments = wrap_fragments("ABCDEFGHIJ", 240.0, twenty_per_char);
        assert_eq!(fragments, vec!["ABCDEFGHIJ"]);
    }

    #[test]
    fn test_wrap_splits_at_available_width() {
        let fragments = wrap_fragments("ABCDEFGH", 90.0, twenty_per_char);
        assert_eq!(fragments, vec!["ABCD", "EFGH"]);
    }

    #[test]
    fn test_wrap_exact_fit_is_not_wrapped() {
        let fragments = wrap_fragments("ABCD", 80.0, twenty_per_char);
        assert_eq!(fragments, vec!["ABCD"]);
    }

    #[test]
    fn test_wrap_exactly_full_fragment_is_kept() {
        // Fit is `<=`: a fragment filling the width exactly stays whole rather
        // than flushing one grapheme early.
        let fragments = wrap_fragments("ABCDEFGH", 80.0, twenty_per_char);
        assert_eq!(fragments, vec!["ABCD", "EFGH"]);
    }

    #[test]
    fn test_wrap_concatenation_preserves_text() {
        let line = "我们在天上的父，愿人都尊你的名为圣。愿你的国降临，愿你的旨意行在地上，如同行在天上。";
        let fragments = wrap_fragments(line, 110.0, twenty_per_char);
        assert!(fragments.len() > 1);
        assert_eq!(fragments.concat(), line);
        for fragment in &fragments {
            assert!(
                twenty_per_char(fragment) <= 110.0,
                "fragment {fragment:?} exceeds available width"
            );
        }
    }

    #[test]
    fn test_wrap_over_wide_grapheme_is_its_own_fragment() {
        // Nothing fits in 10pt; every character is still drawn once.
        let fragments = wrap_fragments("主恩典", 10.0, twenty_per_char);
        assert_eq!(fragments, vec!["主", "恩", "典"]);
    }

    #[test]
    fn test_wrap_keeps_grapheme_clusters_whole() {
        // "e" + combining acute must not be split from its base.
        let line = "e\u{301}e\u{301}e\u{301}";
        let fragments = wrap_fragments(line, 40.0, twenty_per_char);
        assert_eq!(fragments.concat(), line);
        for fragment in &fragments {
            assert!(!fragment.starts_with('\u{301}'), "split cluster: {fragment:?}");
        }
    }

    #[test]
    fn test_wrap_measurement_count_is_linear() {
        let canvas = FixedWidthCanvas::new(20.0);
        let line = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let n = line.chars().count() as u32;
        let fragments = wrap_fragments(line, 90.0, |s| {
            canvas.measure_width(s, FontFamily::Helvetica, 12.0)
        });
        assert_eq!(fragments.concat(), line);
        // One whole-line check plus at most one per appended character.
        assert!(canvas.measurements.get() <= n + 1);
    }

    // ── layout_lines ────────────────────────────────────────────────────────

    #[test]
    fn test_line_that_fits_draws_once() {
        let config = body_only_config(60.0);
        let mut canvas = FixedWidthCanvas::new(20.0);
        let outcome = layout_lines(
            &mut canvas,
            &["ABCDEFGHIJ"],
            &config,
            &FontTable::builtin(),
            decorate,
        );

        let texts = canvas.texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0], (120.0, config.top_y(), "ABCDEFGHIJ".to_string()));
        assert_eq!(outcome.lines_drawn, 1);
        assert_eq!(outcome.page_breaks, 0);
        assert!(
            (outcome.final_cursor - (config.top_y() - config.styles.body.line_height)).abs()
                < 1e-4
        );
        assert_eq!(outcome.final_state, CursorState::InPage);
    }

    #[test]
    fn test_long_line_wraps_into_two_draws() {
        let config = body_only_config(210.0);
        let mut canvas = FixedWidthCanvas::new(20.0);
        layout_lines(
            &mut canvas,
            &["ABCDEFGH"],
            &config,
            &FontTable::builtin(),
            decorate,
        );

        let texts: Vec<String> = canvas.texts().into_iter().map(|t| t.2).collect();
        assert_eq!(texts, vec!["ABCD", "EFGH"]);
        let ys: Vec<f32> = canvas.texts().into_iter().map(|t| t.1).collect();
        assert!((ys[0] - ys[1] - config.styles.body.line_height).abs() < 1e-4);
    }

    #[test]
    fn test_blank_line_consumes_spacer_without_drawing() {
        let config = LayoutConfig::default();
        let mut canvas = FixedWidthCanvas::new(1.0);
        let outcome = layout_lines(
            &mut canvas,
            &["", "   ", "阿们"],
            &config,
            &FontTable::builtin(),
            decorate,
        );

        let texts = canvas.texts();
        assert_eq!(texts.len(), 1);
        let expected_y = config.top_y() - 2.0 * config.styles.blank_spacer;
        assert!((texts[0].1 - expected_y).abs() < 1e-4);
        assert_eq!(outcome.lines_drawn, 1);
    }

    #[test]
    fn test_cursor_strictly_decreases_by_line_height() {
        let config = LayoutConfig::default();
        let lines = ["一，感恩", "开场白", "1,为教会", "愿主赐福"];
        let mut canvas = FixedWidthCanvas::new(1.0);
        layout_lines(&mut canvas, &lines, &config, &FontTable::builtin(), decorate);

        let ys: Vec<f32> = canvas.texts().into_iter().map(|t| t.1).collect();
        let heights = [
            config.styles.heading.line_height,
            config.styles.sub_heading.line_height,
            config.styles.numbered_item.line_height,
        ];
        for (i, pair) in ys.windows(2).enumerate() {
            assert!(pair[1] < pair[0]);
            assert!((pair[0] - pair[1] - heights[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn test_indent_follows_style_class() {
        let config = LayoutConfig::default();
        let lines = ["一，感恩", "1,为教会", "愿主赐福"];
        let mut canvas = FixedWidthCanvas::new(1.0);
        layout_lines(&mut canvas, &lines, &config, &FontTable::builtin(), decorate);

        let xs: Vec<f32> = canvas.texts().into_iter().map(|t| t.0).collect();
        assert_eq!(xs, vec![60.0, 80.0, 90.0]);
    }

    #[test]
    fn test_page_break_before_draw_below_bottom_margin() {
        // top_y = 250, bottom = 80, body line height 36:
        // baselines 250, 214, 178, 142, 106 fit; the cursor then sits at 70.
        let mut config = LayoutConfig {
            page: PageSize {
                width: 595.0,
                height: 300.0,
            },
            ..LayoutConfig::default()
        };
        config.margins.top = 50.0;
        let lines = vec!["愿主赐福"; 6];
        let mut canvas = FixedWidthCanvas::new(1.0);
        let outcome = layout_lines(&mut canvas, &lines, &config, &FontTable::builtin(), decorate);

        assert_eq!(outcome.page_breaks, 1);
        assert_eq!(canvas.count(&Event::NewPage), 1);
        assert_eq!(canvas.count(&Event::Decorated), 1);

        let ys: Vec<f32> = canvas.texts().into_iter().map(|t| t.1).collect();
        assert_eq!(ys, vec![250.0, 214.0, 178.0, 142.0, 106.0, 250.0]);

        // New page, decoration, font re-applied, then the draw.
        let break_at = canvas
            .events
            .iter()
            .position(|e| *e == Event::NewPage)
            .unwrap();
        assert_eq!(canvas.events[break_at + 1], Event::Decorated);
        assert!(matches!(canvas.events[break_at + 2], Event::Font(..)));
        assert!(matches!(canvas.events[break_at + 3], Event::Text { .. }));
    }

    #[test]
    fn test_page_break_can_happen_mid_wrap() {
        let mut config = LayoutConfig {
            page: PageSize {
                width: 420.0,
                height: 300.0,
            },
            ..LayoutConfig::default()
        };
        config.margins.top = 50.0;
        config.styles.body.extra_indent = 210.0;
        // 4 chars per fragment at 20pt → 7 fragments, 5 fit on the first page.
        let line = "ABCDEFGHIJKLMNOPQRSTUVWXYZAB";
        let mut canvas = FixedWidthCanvas::new(20.0);
        let outcome = layout_lines(&mut canvas, &[line], &config, &FontTable::builtin(), decorate);

        assert_eq!(outcome.lines_drawn, 7);
        assert_eq!(outcome.page_breaks, 1);
        let drawn: String = canvas.texts().into_iter().map(|t| t.2).collect();
        assert_eq!(drawn, line);
    }

    #[test]
    fn test_blank_lines_never_break_pages() {
        let mut config = LayoutConfig {
            page: PageSize {
                width: 595.0,
                height: 300.0,
            },
            ..LayoutConfig::default()
        };
        config.margins.top = 50.0;
        let lines = vec![""; 20];
        let mut canvas = FixedWidthCanvas::new(1.0);
        let outcome = layout_lines(&mut canvas, &lines, &config, &FontTable::builtin(), decorate);

        assert_eq!(outcome.page_breaks, 0);
        assert_eq!(outcome.final_state, CursorState::NeedsBreak);
        assert!((outcome.final_cursor - (250.0 - 20.0 * 25.0)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_input_leaves_cursor_at_top() {
        let config = LayoutConfig::default();
        let mut canvas = FixedWidthCanvas::new(1.0);
        let lines: [&str; 0] = [];
        let outcome = layout_lines(&mut canvas, &lines, &config, &FontTable::builtin(), decorate);
        assert_eq!(outcome.final_state, CursorState::AtTop);
        assert_eq!(outcome.lines_drawn, 0);
        assert!(canvas.events.is_empty());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let config = LayoutConfig::default();
        let lines = [
            "一，感恩赞美",
            "",
            "1,为新的一年里每一位弟兄姊妹的身体健康和灵命成长祷告",
            "愿神的恩典与平安常与我们同在，直到世世代代，永永远远。阿们！",
        ];
        let render = || {
            let mut canvas = RecordingCanvas::new(config.page);
            layout_lines(&mut canvas, &lines, &config, &FontTable::builtin(), |_| {});
            canvas.into_script()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_bold_family_used_for_every_class() {
        let config = LayoutConfig::default();
        let fonts = FontTable::builtin();
        let lines = ["一，感恩", "开场白", "1,为教会", "愿主赐福"];
        let mut canvas = RecordingCanvas::new(config.page);
        layout_lines(&mut canvas, &lines, &config, &fonts, |_| {});
        let script = canvas.into_script();

        let fonts_set: Vec<FontFamily> = script.pages[0]
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetFont { font, .. } => Some(*font),
                _ => None,
            })
            .collect();
        assert_eq!(fonts_set.len(), 4);
        assert!(fonts_set
            .iter()
            .all(|f| *f == fonts.family(FontWeight::Bold)));
        assert_eq!(config.styles.style(StyleClass::Body).weight, FontWeight::Bold);
    }

    // ── config ──────────────────────────────────────────────────────────────

    #[test]
    fn test_default_config_is_valid() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.top_y() - (841.8898 - 150.0)).abs() < 1e-3);
        assert!((config.content_width() - (595.2756 - 120.0)).abs() < 1e-3);
    }

    #[test]
    fn test_config_rejects_crossed_margins() {
        let mut config = LayoutConfig::default();
        config.margins.top = 800.0;
        assert!(matches!(
            config.validate(),
            Err(LayoutConfigError::NoContentHeight { .. })
        ));

        let mut config = LayoutConfig::default();
        config.margins.left = 300.0;
        config.margins.right = 300.0;
        assert!(matches!(
            config.validate(),
            Err(LayoutConfigError::NoContentWidth(_))
        ));
    }

    #[test]
    fn test_config_rejects_indent_wider_than_content() {
        let mut config = LayoutConfig::default();
        config.styles.body.extra_indent = config.content_width();
        assert!(matches!(
            config.validate(),
            Err(LayoutConfigError::NoStyleWidth { .. })
        ));
    }

    #[test]
    fn test_config_rejects_zero_line_height() {
        let mut config = LayoutConfig::default();
        config.styles.body.line_height = 0.0;
        assert_eq!(config.validate(), Err(LayoutConfigError::NonPositiveAdvance));
    }
}
