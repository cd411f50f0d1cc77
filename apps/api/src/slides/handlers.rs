//! Axum route handlers for the Slides API.

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::slides::{
    replace_in_deck, replace_per_slide, set_runs, PageReplacements, Replacement, RunEdit, Slide,
    SlideOp, SlideOrder, SlideText,
};

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub slide_count: usize,
    #[serde(default)]
    pub operations: Vec<SlideOp>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub order: Vec<Slide>,
    /// Page numbers skipped by batch operations, in the order they were met.
    pub skipped: Vec<usize>,
}

/// POST /api/v1/slides/plan
///
/// Applies the operations in sequence. A failing single-page operation
/// rejects the whole plan with the index of the offending step.
pub async fn handle_plan(Json(request): Json<PlanRequest>) -> Result<Json<PlanResponse>, AppError> {
    let mut order = SlideOrder::new(request.slide_count)?;
    let mut skipped = Vec::new();

    for (i, op) in request.operations.iter().enumerate() {
        let report = order
            .apply(op)
            .map_err(|e| AppError::Validation(format!("operation {i}: {e}")))?;
        skipped.extend(report.skipped);
    }

    info!(
        slides = order.len(),
        operations = request.operations.len(),
        skipped = skipped.len(),
        "Slide plan applied"
    );

    Ok(Json(PlanResponse {
        order: order.slides().to_vec(),
        skipped,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRequest {
    pub slides: Vec<SlideText>,
    pub replacements: Vec<Replacement>,
    /// 1-based; all slides when absent.
    pub slide_number: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub slides: Vec<SlideText>,
    pub runs_changed: usize,
}

/// POST /api/v1/slides/replace
pub async fn handle_replace(
    Json(mut request): Json<ReplaceRequest>,
) -> Result<Json<ReplaceResponse>, AppError> {
    let runs_changed = replace_in_deck(
        &mut request.slides,
        &request.replacements,
        request.slide_number,
    )?;

    Ok(Json(ReplaceResponse {
        slides: request.slides,
        runs_changed,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PageReplaceRequest {
    pub slides: Vec<SlideText>,
    pub pages: Vec<PageReplacements>,
}

#[derive(Debug, Serialize)]
pub struct PageReplaceResponse {
    pub slides: Vec<SlideText>,
    pub runs_changed: usize,
    /// Pages outside the deck, left untouched.
    pub skipped: Vec<usize>,
}

/// POST /api/v1/slides/replace/pages
///
/// A separate replacement list per page.
pub async fn handle_replace_pages(
    Json(mut request): Json<PageReplaceRequest>,
) -> Result<Json<PageReplaceResponse>, AppError> {
    let report = replace_per_slide(&mut request.slides, &request.pages);

    Ok(Json(PageReplaceResponse {
        slides: request.slides,
        runs_changed: report.runs_changed,
        skipped: report.skipped,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RunEditRequest {
    pub slides: Vec<SlideText>,
    /// 1-based.
    pub slide_number: usize,
    pub edits: Vec<RunEdit>,
}

#[derive(Debug, Serialize)]
pub struct RunEditResponse {
    pub slides: Vec<SlideText>,
    pub replaced: usize,
    pub appended: usize,
}

/// POST /api/v1/slides/runs
///
/// Sets runs by shape, paragraph and run index on one slide.
pub async fn handle_set_runs(
    Json(mut request): Json<RunEditRequest>,
) -> Result<Json<RunEditResponse>, AppError> {
    let report = set_runs(&mut request.slides, request.slide_number, &request.edits)?;

    Ok(Json(RunEditResponse {
        slides: request.slides,
        replaced: report.replaced,
        appended: report.appended,
    }))
}
