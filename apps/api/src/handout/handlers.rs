//! Axum route handlers for the Handout API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handout::{load_sections, render_handout, CoverPage, HandoutSection, HandoutSummary};
use crate::layout::{DrawScript, LayoutConfig, RecordingCanvas};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HandoutRequest {
    pub cover: Option<CoverPage>,
    /// Inline sections. Ignored when `from_dir` is set.
    #[serde(default)]
    pub sections: Vec<HandoutSection>,
    /// Read `0.txt…` from the configured sections directory instead.
    #[serde(default)]
    pub from_dir: bool,
    pub config: Option<LayoutConfig>,
}

#[derive(Debug, Serialize)]
pub struct HandoutResponse {
    pub summary: HandoutSummary,
    pub script: DrawScript,
}

/// POST /api/v1/handout
///
/// Renders cover + sections and returns the recorded draw script.
pub async fn handle_handout(
    State(state): State<AppState>,
    Json(request): Json<HandoutRequest>,
) -> Result<Json<HandoutResponse>, AppError> {
    let config = request.config.unwrap_or_else(|| state.layout.clone());
    config.validate()?;

    if !request.from_dir && request.sections.is_empty() {
        return Err(AppError::Validation(
            "provide sections or set from_dir".to_string(),
        ));
    }

    let cover = request.cover.unwrap_or_default();
    let fonts = state.fonts.clone();
    let logo = state.logo.clone();
    let from_dir = request
        .from_dir
        .then(|| (state.config.sections_dir.clone(), state.config.section_count));
    let inline_sections = request.sections;

    let (summary, script) = tokio::task::spawn_blocking(move || {
        let sections = match from_dir {
            Some((dir, count)) => load_sections(&dir, count),
            None => inline_sections,
        };
        let mut canvas = RecordingCanvas::new(config.page);
        let summary = render_handout(&mut canvas, &config, &fonts, &cover, &sections, &logo);
        (summary, canvas.into_script())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in handout: {e}")))?;

    Ok(Json(HandoutResponse { summary, script }))
}
