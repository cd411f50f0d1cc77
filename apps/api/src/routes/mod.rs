pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{handout, layout, scripture, slides};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Layout API
        .route("/api/v1/layout", post(layout::handlers::handle_layout))
        .route("/api/v1/handout", post(handout::handlers::handle_handout))
        // Scripture API
        .route("/api/v1/verses", get(scripture::handlers::handle_get_verses))
        // Slides API
        .route("/api/v1/slides/plan", post(slides::handlers::handle_plan))
        .route(
            "/api/v1/slides/replace",
            post(slides::handlers::handle_replace),
        )
        .route(
            "/api/v1/slides/replace/pages",
            post(slides::handlers::handle_replace_pages),
        )
        .route("/api/v1/slides/runs", post(slides::handlers::handle_set_runs))
        .with_state(state)
}
