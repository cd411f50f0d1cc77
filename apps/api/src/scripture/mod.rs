//! Scripture lookup: verse text for the reading slides.
//!
//! `VerseSource` is the seam: `BibleApiClient` talks to bible-api.com, tests
//! swap in a canned source. `AppState` holds an `Arc<dyn VerseSource>`.

pub mod client;
pub mod handlers;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::BibleApiClient;

/// Chinese Union Version.
pub const TRANSLATION_CUV: &str = "cuv";
/// Louis Segond (French).
#[cfg(test)]
pub const TRANSLATION_LSF: &str = "lsf";

#[derive(Debug, Error)]
pub enum ScriptureError {
    #[error("Invalid verse reference: {0}")]
    InvalidReference(String),

    #[error("No verses returned for {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A contiguous verse range within one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRef {
    /// Book name as the API accepts it, e.g. `路加福音` or `Luke`.
    pub book: String,
    pub chapter: u16,
    pub start_verse: u16,
    pub end_verse: u16,
}

impl VerseRef {
    pub fn new(book: impl Into<String>, chapter: u16, start_verse: u16, end_verse: u16) -> Self {
        Self {
            book: book.into(),
            chapter,
            start_verse,
            end_verse,
        }
    }

    pub fn validate(&self) -> Result<(), ScriptureError> {
        if self.book.trim().is_empty() {
            return Err(ScriptureError::InvalidReference(
                "book cannot be empty".to_string(),
            ));
        }
        if self.chapter == 0 || self.start_verse == 0 {
            return Err(ScriptureError::InvalidReference(
                "chapter and verses are numbered from 1".to_string(),
            ));
        }
        if self.end_verse < self.start_verse {
            return Err(ScriptureError::InvalidReference(format!(
                "end verse {} is before start verse {}",
                self.end_verse, self.start_verse
            )));
        }
        Ok(())
    }

    /// `book chapter:start-end`, the form the API path takes.
    pub fn query(&self) -> String {
        format!(
            "{} {}:{}-{}",
            self.book.trim(),
            self.chapter,
            self.start_verse,
            self.end_verse
        )
    }
}

impl std::fmt::Display for VerseRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.query())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub book_name: String,
    pub chapter: u16,
    pub verse: u16,
    pub text: String,
}

#[async_trait]
pub trait VerseSource: Send + Sync {
    async fn fetch(&self, reference: &VerseRef, translation: &str)
        -> Result<Vec<Verse>, ScriptureError>;
}

/// Slide-ready lines: verse number, ideographic space, text.
pub fn numbered_lines(verses: &[Verse]) -> Vec<String> {
    verses
        .iter()
        .map(|v| format!("{}\u{3000}{}", v.verse, v.text))
        .collect()
}
