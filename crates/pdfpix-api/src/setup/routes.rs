//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use pdfpix_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api_doc;
use crate::handlers;
use crate::state::AppState;

/// A multipart batch may carry several files; the request body limit is
/// sized for this many at the per-file maximum.
const MAX_BATCH_FILES: usize = 10;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api_routes = Router::new()
        .route(
            "/extract-images",
            post(handlers::extract_images::extract_images),
        )
        .route(
            "/images/{pdf_id}/{*image_filename}",
            get(handlers::image_get::get_image),
        )
        .route("/pdf/{pdf_id}/images", get(handlers::image_list::list_pdf_images))
        .route("/health", get(handlers::health::health_check));

    let openapi_spec = api_doc::get_openapi_spec(&config.api_prefix);

    // Server-level concurrency limit to protect against resource exhaustion under load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1024)
        .max(1);

    let body_limit = config.max_upload_size_bytes.saturating_mul(MAX_BATCH_FILES);

    let app = Router::new()
        .nest(&config.api_prefix, api_routes)
        .route(
            "/api/openapi.json",
            get(move || async move { Json(openapi_spec) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let exposed = [
        header::CONTENT_DISPOSITION,
        HeaderName::from_static("x-image-count"),
    ];

    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(exposed)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .expose_headers(exposed)
    };

    Ok(cors)
}
