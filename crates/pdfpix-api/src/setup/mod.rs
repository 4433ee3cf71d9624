//! Application setup and initialization
//!
//! All initialization logic lives here instead of main.rs so integration
//! tests can assemble the router against their own configuration.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use pdfpix_core::Config;

use crate::state::AppState;

/// Initialize the entire application. Must run inside a tokio runtime
/// (the cleanup sweeper is spawned here).
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!("Configuration loaded and validated successfully");

    std::fs::create_dir_all(config.images_dir())
        .with_context(|| format!("Failed to create {}", config.images_dir().display()))?;

    let state = Arc::new(AppState::new(config.clone()));

    crate::cleanup::spawn_cleanup_task(&config);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
