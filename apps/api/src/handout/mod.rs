//! Prayer-meeting handout: a cover page followed by one or more pages per
//! section file, each page carrying the church logo in the top-right corner.
//!
//! # Flow
//! - `render_cover` paints the full-page red cover with centred title, date
//!   and church name.
//! - For every section a new page is started and decorated, then the section's
//!   lines go through `layout_lines`, which decorates any further pages it opens.
//! - A missing section file becomes a one-line placeholder page.

pub mod handlers;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::layout::{layout_lines, Canvas, FontFamily, FontTable, LayoutConfig, PageSize, Rgb};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Cover text. Defaults to the 2026 new-year prayer meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverPage {
    pub title: String,
    pub date: NaiveDate,
    pub church: String,
}

impl Default for CoverPage {
    fn default() -> Self {
        Self {
            title: "辞旧迎新祷告会".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            church: "巴黎基督国度爱心教会".to_string(),
        }
    }
}

/// One handout section. `lines == None` means its source file was missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoutSection {
    pub name: String,
    pub lines: Option<Vec<String>>,
}

impl HandoutSection {
    /// Splits on `\n`, dropping the `\r` of CRLF line endings.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self {
            name: name.into(),
            lines: Some(lines),
        }
    }

    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: None,
        }
    }
}

/// Logo drawn in the top-right corner of every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    pub path: PathBuf,
    pub width: f32,
    pub height: f32,
    /// Gap to the top and right page edges.
    pub inset: f32,
    /// False when the image file was not found at startup; nothing is drawn.
    pub available: bool,
}

impl Logo {
    /// Builds the 80×80 logo, checking once whether the file exists.
    pub fn resolve(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let available = path.is_file();
        if !available {
            warn!(path = %path.display(), "Logo image not found; pages will have no logo");
        }
        Self {
            path,
            width: 80.0,
            height: 80.0,
            inset: 20.0,
            available,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandoutSummary {
    pub pages: u32,
    pub sections_rendered: u32,
    pub sections_missing: u32,
    pub lines_drawn: u32,
}

const COVER_RED: Rgb = Rgb {
    r: 0.8,
    g: 0.0,
    b: 0.0,
};
const TITLE_SIZE: f32 = 50.0;
const DATE_SIZE: f32 = 30.0;
const CHURCH_SIZE: f32 = 24.0;
const PLACEHOLDER_SIZE: f32 = 16.0;
const PLACEHOLDER_X: f32 = 60.0;
const PLACEHOLDER_DROP: f32 = 100.0;

// ────────────────────────────────────────────────────────────────────────────
// Drawing
// ────────────────────────────────────────────────────────────────────────────

/// Places the logo in the top-right corner of the current page.
pub fn draw_logo<C: Canvas + ?Sized>(canvas: &mut C, page: PageSize, logo: &Logo) {
    if !logo.available {
        return;
    }
    let x = page.width - logo.width - logo.inset;
    let y = page.height - logo.height - logo.inset;
    canvas.draw_image(&logo.path, x, y, logo.width, logo.height);
}

fn draw_centered<C: Canvas + ?Sized>(
    canvas: &mut C,
    page: PageSize,
    y: f32,
    text: &str,
    font: FontFamily,
    size: f32,
) {
    canvas.set_font(font, size);
    let width = canvas.measure_width(text, font, size);
    canvas.draw_text((page.width - width) / 2.0, y, text);
}

/// Paints the cover on the current page and leaves the fill colour black.
pub fn render_cover<C: Canvas + ?Sized>(
    canvas: &mut C,
    page: PageSize,
    fonts: &FontTable,
    cover: &CoverPage,
    logo: &Logo,
) {
    canvas.set_fill_color(COVER_RED);
    canvas.fill_rect(0.0, 0.0, page.width, page.height);
    canvas.set_fill_color(Rgb::WHITE);

    draw_logo(canvas, page, logo);

    let middle = page.height / 2.0;
    draw_centered(canvas, page, middle + 80.0, &cover.title, fonts.bold, TITLE_SIZE);
    let date = cover.date.format("%Y-%m-%d").to_string();
    draw_centered(canvas, page, middle + 20.0, &date, fonts.regular, DATE_SIZE);
    draw_centered(canvas, page, middle - 50.0, &cover.church, fonts.regular, CHURCH_SIZE);

    canvas.set_fill_color(Rgb::BLACK);
}

/// Renders the complete handout: cover on the current page, then every section.
pub fn render_handout<C: Canvas + ?Sized>(
    canvas: &mut C,
    config: &LayoutConfig,
    fonts: &FontTable,
    cover: &CoverPage,
    sections: &[HandoutSection],
    logo: &Logo,
) -> HandoutSummary {
    let page = config.page;
    render_cover(canvas, page, fonts, cover, logo);

    let mut summary = HandoutSummary {
        pages: 1,
        sections_rendered: 0,
        sections_missing: 0,
        lines_drawn: 0,
    };

    for section in sections {
        canvas.start_new_page();
        draw_logo(canvas, page, logo);
        summary.pages += 1;

        match &section.lines {
            Some(lines) => {
                let outcome = layout_lines(canvas, lines, config, fonts, |canvas| {
                    draw_logo(canvas, page, logo)
                });
                summary.pages += outcome.page_breaks;
                summary.lines_drawn += outcome.lines_drawn;
                summary.sections_rendered += 1;
            }
            None => {
                canvas.set_font(fonts.regular, PLACEHOLDER_SIZE);
                canvas.draw_text(
                    PLACEHOLDER_X,
                    page.height - PLACEHOLDER_DROP,
                    &format!("文件 {} 未找到", section.name),
                );
                summary.sections_missing += 1;
            }
        }
    }

    info!(
        pages = summary.pages,
        missing = summary.sections_missing,
        "Handout rendered"
    );
    summary
}

// ────────────────────────────────────────────────────────────────────────────
// Section files
// ────────────────────────────────────────────────────────────────────────────

/// Loads `0.txt` … `{count - 1}.txt` from `dir`.
/// Unreadable files become missing sections.
pub fn load_sections(dir: &Path, count: usize) -> Vec<HandoutSection> {
    (0..count)
        .map(|i| {
            let name = format!("{i}.txt");
            let path = dir.join(&name);
            match fs::read_to_string(&path) {
                Ok(text) => HandoutSection::from_text(name, &text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Section file not found");
                    HandoutSection::missing(name)
                }
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
