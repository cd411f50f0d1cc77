//! The drawing surface the layout engine talks to.
//!
//! `Canvas` mirrors the handful of primitives a PDF page canvas offers.
//! `RecordingCanvas` is the implementation the service uses: it measures with
//! the static metric tables and records every call as a `DrawCommand`, grouped
//! by page, so the result can be returned as JSON and replayed by a writer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::engine::PageSize;
use crate::layout::font_metrics::{get_metrics, FontFamily};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };
}

pub trait Canvas {
    fn set_font(&mut self, font: FontFamily, size: f32);

    fn measure_width(&self, text: &str, font: FontFamily, size: f32) -> f32;

    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str);

    /// Finalizes the current page and opens a blank one.
    fn start_new_page(&mut self);

    fn set_fill_color(&mut self, _color: Rgb) {}

    fn fill_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {}

    fn draw_image(&mut self, _path: &Path, _x: f32, _y: f32, _width: f32, _height: f32) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    SetFont {
        font: FontFamily,
        size: f32,
    },
    SetFillColor {
        color: Rgb,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    DrawImage {
        path: PathBuf,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    DrawText {
        x: f32,
        y: f32,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPage {
    /// 1-based.
    pub number: u32,
    pub commands: Vec<DrawCommand>,
}

/// Everything drawn during one document pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawScript {
    pub page_size: PageSize,
    pub pages: Vec<RecordedPage>,
}

impl DrawScript {
    /// All drawn strings in order, across pages.
    #[cfg(test)]
    pub fn texts(&self) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| p.commands.iter())
            .filter_map(|c| match c {
                DrawCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

pub struct RecordingCanvas {
    page_size: PageSize,
    pages: Vec<RecordedPage>,
}

impl RecordingCanvas {
    /// Opens a canvas with its first page already started.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            pages: vec![RecordedPage {
                number: 1,
                commands: Vec::new(),
            }],
        }
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn into_script(self) -> DrawScript {
        DrawScript {
            page_size: self.page_size,
            pages: self.pages,
        }
    }

    fn push(&mut self, command: DrawCommand) {
        // `pages` is never empty: `new` opens page 1.
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }
}

impl Canvas for RecordingCanvas {
    fn set_font(&mut self, font: FontFamily, size: f32) {
        self.push(DrawCommand::SetFont { font, size });
    }

    fn measure_width(&self, text: &str, font: FontFamily, size: f32) -> f32 {
        get_metrics(&font).string_width(text, size)
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        self.push(DrawCommand::DrawText {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn start_new_page(&mut self) {
        let number = self.pages.len() as u32 + 1;
        self.pages.push(RecordedPage {
            number,
            commands: Vec::new(),
        });
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.push(DrawCommand::SetFillColor { color });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_image(&mut self, path: &Path, x: f32, y: f32, width: f32, height: f32) {
        self.push(DrawCommand::DrawImage {
            path: path.to_path_buf(),
            x,
            y,
            width,
            height,
        });
    }
}
