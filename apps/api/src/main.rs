mod care;
mod catalog;
mod config;
mod errors;
mod models;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::registry::SessionRegistry;
use crate::session::terminator::{HttpTerminator, LoggingTerminator, SessionTerminator};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
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

    info!("Starting Dahon API v{}", env!("CARGO_PKG_VERSION"));

    // Load the plant dataset
    let catalog = match &config.dataset_path {
        Some(path) => Catalog::load(path, &config.image_root)
            .with_context(|| format!("Failed to load plant dataset {}", path.display()))?,
        None => Catalog::bundled(&config.image_root).context("Bundled plant dataset is invalid")?,
    };
    info!("Plant catalog ready ({} records)", catalog.len());

    // Forced sign-out goes to the auth provider when one is configured
    let terminator: Arc<dyn SessionTerminator> = match &config.auth_sign_out_url {
        Some(url) => {
            info!("Idle sign-out endpoint: {url}");
            Arc::new(HttpTerminator::new(url.clone())?)
        }
        None => {
            info!("No AUTH_SIGN_OUT_URL; idle sign-outs are logged only");
            Arc::new(LoggingTerminator)
        }
    };
    info!(
        "Idle thresholds: warn after {:?}, sign out after {:?}",
        config.idle.warn_after, config.idle.sign_out_after
    );

    // Build app state
    let state = AppState {
        catalog: Arc::new(catalog),
        config: config.clone(),
        sessions: SessionRegistry::new(),
        terminator,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
