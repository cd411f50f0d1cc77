//! Axum route handlers for the Scripture API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::scripture::{numbered_lines, Verse, VerseRef};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerseQuery {
    pub book: String,
    pub chapter: u16,
    pub start: u16,
    /// Defaults to `start` (a single verse).
    pub end: Option<u16>,
    pub translation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerseResponse {
    pub reference: String,
    pub translation: String,
    pub verses: Vec<Verse>,
    /// Numbered lines ready to paste into a scripture slide.
    pub lines: Vec<String>,
}

/// GET /api/v1/verses?book=路加福音&chapter=9&start=1&end=27
pub async fn handle_get_verses(
    State(state): State<AppState>,
    Query(query): Query<VerseQuery>,
) -> Result<Json<VerseResponse>, AppError> {
    let reference = VerseRef::new(
        query.book,
        query.chapter,
        query.start,
        query.end.unwrap_or(query.start),
    );
    reference.validate()?;

    let translation = query
        .translation
        .unwrap_or_else(|| state.config.bible_translation.clone());

    let verses = state.verses.fetch(&reference, &translation).await?;
    let lines = numbered_lines(&verses);

    Ok(Json(VerseResponse {
        reference: reference.to_string(),
        translation,
        verses,
        lines,
    }))
}
