use std::path::{Component, Path as FsPath};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use pdfpix_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const NOT_FOUND_MESSAGE: &str = "Image not found or has been cleaned up";

/// Reject identifiers that could escape the images directory.
fn is_safe_relative(path: &str) -> bool {
    let path = FsPath::new(path);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
}

/// Serve an extracted image file
#[utoipa::path(
    get,
    path = "/api/v1/images/{pdf_id}/{image_filename}",
    tag = "pdf",
    params(
        ("pdf_id" = String, Path, description = "Upload identifier returned by extraction"),
        ("image_filename" = String, Path, description = "Image filename, e.g. page_1_image_1.png")
    ),
    responses(
        (status = 200, description = "Image file", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path((pdf_id, image_filename)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    if !is_safe_relative(&pdf_id) || !is_safe_relative(&image_filename) {
        return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string()).into());
    }

    let image_path = state.extractor.upload_dir(&pdf_id).join(&image_filename);

    let data = tokio::fs::read(&image_path)
        .await
        .map_err(|_| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    let content_type = mime_guess::from_path(&image_path)
        .first_or_octet_stream()
        .to_string();

    // The filename in the disposition is the last path segment only
    let basename = FsPath::new(&image_filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&image_filename)
        .to_string();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", basename),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
