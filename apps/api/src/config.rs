use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::layout::fonts::default_font_dirs;
use crate::scripture::TRANSLATION_CUV;

/// Application configuration loaded from environment variables.
/// Every variable is optional; defaults match the weekly handout setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directories searched for the CJK font pair, in order.
    pub font_dirs: Vec<PathBuf>,
    pub logo_path: PathBuf,
    /// Directory holding the `0.txt`, `1.txt`, … handout sections.
    pub sections_dir: PathBuf,
    pub section_count: usize,
    pub bible_api_url: String,
    pub bible_translation: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let font_dirs = match std::env::var_os("FONT_DIRS") {
            Some(raw) => std::env::split_paths(&raw).collect(),
            None => default_font_dirs(),
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            font_dirs,
            logo_path: env_or("LOGO_PATH", "爱心教会.png").into(),
            sections_dir: env_or("SECTIONS_DIR", ".").into(),
            section_count: std::env::var("SECTION_COUNT")
                .unwrap_or_else(|_| "6".to_string())
                .parse::<usize>()
                .context("SECTION_COUNT must be a non-negative integer")?,
            bible_api_url: env_or("BIBLE_API_URL", "https://bible-api.com"),
            bible_translation: env_or("BIBLE_TRANSLATION", TRANSLATION_CUV),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
