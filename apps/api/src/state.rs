use std::sync::Arc;

use crate::config::Config;
use crate::handout::Logo;
use crate::layout::{FontTable, LayoutConfig};
use crate::scripture::VerseSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Resolved once at startup; every layout pass draws with it.
    pub fonts: Arc<FontTable>,
    /// Default page, margins and style sheet. Requests may override it.
    pub layout: LayoutConfig,
    pub logo: Logo,
    /// Pluggable verse lookup. Default: `BibleApiClient`.
    pub verses: Arc<dyn VerseSource>,
}
