//! Axum route handlers for the Layout API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::handout::draw_logo;
use crate::layout::{layout_lines, DrawScript, LayoutConfig, LayoutOutcome, RecordingCanvas};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub lines: Vec<String>,
    /// Overrides the service's default page, margins and styles.
    pub config: Option<LayoutConfig>,
    /// Draw the logo on every page, including the first.
    #[serde(default)]
    pub with_logo: bool,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    pub outcome: LayoutOutcome,
    pub script: DrawScript,
}

/// POST /api/v1/layout
///
/// Lays out a list of lines on fresh pages and returns the recorded draw script.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    let config = request.config.unwrap_or_else(|| state.layout.clone());
    config.validate()?;

    let fonts = state.fonts.clone();
    let logo = request.with_logo.then(|| state.logo.clone());
    let lines = request.lines;

    // CPU-bound pass, off the async executor.
    let (outcome, script) = tokio::task::spawn_blocking(move || {
        let mut canvas = RecordingCanvas::new(config.page);
        if let Some(logo) = &logo {
            draw_logo(&mut canvas, config.page, logo);
        }
        let outcome = layout_lines(&mut canvas, &lines, &config, &fonts, |canvas| {
            if let Some(logo) = &logo {
                draw_logo(canvas, config.page, logo);
            }
        });
        (outcome, canvas.into_script())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))?;

    info!(
        lines = outcome.lines_drawn,
        pages = script.pages.len(),
        "Layout pass complete"
    );

    Ok(Json(LayoutResponse { outcome, script }))
}
