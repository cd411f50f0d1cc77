mod config;
mod errors;
mod handout;
mod layout;
mod routes;
mod scripture;
mod slides;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::handout::Logo;
use crate::layout::{resolve_fonts, LayoutConfig};
use crate::routes::build_router;
use crate::scripture::BibleApiClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lectern API v{}", env!("CARGO_PKG_VERSION"));

    let fonts = resolve_fonts(&config.font_dirs);
    info!(
        "Fonts: {} / {} (cjk: {})",
        fonts.regular.postscript_name(),
        fonts.bold.postscript_name(),
        fonts.is_cjk()
    );

    let logo = Logo::resolve(config.logo_path.clone());

    let layout = LayoutConfig::default();
    layout
        .validate()
        .context("default layout config is unusable")?;

    let verses = BibleApiClient::new(config.bible_api_url.clone())
        .context("failed to build the verse API client")?;
    info!(
        "Verse client initialized ({}, translation {})",
        verses.base_url(),
        config.bible_translation
    );

    let state = AppState {
        config: config.clone(),
        fonts: Arc::new(fonts),
        layout,
        logo,
        verses: Arc::new(verses),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
