//! Font resolution: runs once at startup and produces the `FontTable` every
//! layout pass draws with.
//!
//! The CJK pair is only usable when both files are present in the same search
//! directory. Otherwise the Helvetica pair is used, which cannot render
//! Chinese glyphs but keeps the handout printable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::layout::font_metrics::FontFamily;
use crate::layout::style::FontWeight;

const CJK_REGULAR_FILE: &str = "simsun.ttc";
const CJK_BOLD_FILE: &str = "simhei.ttf";

/// The resolved regular/bold families plus the files they were loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontTable {
    pub regular: FontFamily,
    pub bold: FontFamily,
    pub regular_path: Option<PathBuf>,
    pub bold_path: Option<PathBuf>,
}

impl FontTable {
    /// The built-in pair that needs no font files.
    pub fn builtin() -> Self {
        Self {
            regular: FontFamily::Helvetica,
            bold: FontFamily::HelveticaBold,
            regular_path: None,
            bold_path: None,
        }
    }

    /// CJK pair loaded from `dir`.
    pub fn cjk(dir: &Path) -> Self {
        Self {
            regular: FontFamily::SimSun,
            bold: FontFamily::SimHei,
            regular_path: Some(dir.join(CJK_REGULAR_FILE)),
            bold_path: Some(dir.join(CJK_BOLD_FILE)),
        }
    }

    pub fn family(&self, weight: FontWeight) -> FontFamily {
        match weight {
            FontWeight::Regular => self.regular,
            FontWeight::Bold => self.bold,
        }
    }

    pub fn is_cjk(&self) -> bool {
        self.regular == FontFamily::SimSun
    }
}

impl Default for FontTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Default search path: the Windows font folder, then the working directory.
pub fn default_font_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("C:/Windows/Fonts"), PathBuf::from(".")]
}

/// Walks `search_dirs` in order and returns the first directory's CJK pair,
/// or the built-in pair when no directory holds both files.
pub fn resolve_fonts(search_dirs: &[PathBuf]) -> FontTable {
    for dir in search_dirs {
        if dir.join(CJK_REGULAR_FILE).is_file() && dir.join(CJK_BOLD_FILE).is_file() {
            info!(dir = %dir.display(), "Loaded CJK font pair");
            return FontTable::cjk(dir);
        }
        warn!(
            dir = %dir.display(),
            "CJK fonts not found, trying next font directory"
        );
    }

    warn!("No CJK fonts found; falling back to Helvetica (Chinese text may not render)");
    FontTable::builtin()
}
