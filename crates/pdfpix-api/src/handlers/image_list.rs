use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use pdfpix_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageEntry {
    /// Image filename, unique within the upload
    pub id: String,
    pub url: String,
    pub pdf_id: String,
}

/// List all images extracted from one upload
///
/// Entries are sorted by `id` ascending.
#[utoipa::path(
    get,
    path = "/api/v1/pdf/{pdf_id}/images",
    tag = "pdf",
    params(
        ("pdf_id" = String, Path, description = "Upload identifier returned by extraction")
    ),
    responses(
        (status = 200, description = "Images for this upload", body = [ImageEntry]),
        (status = 404, description = "Unknown upload identifier", body = ErrorResponse)
    )
)]
pub async fn list_pdf_images(
    State(state): State<Arc<AppState>>,
    Path(pdf_id): Path<String>,
) -> Result<Json<Vec<ImageEntry>>, HttpAppError> {
    let dir = state.extractor.upload_dir(&pdf_id);

    let mut read_dir = tokio::fs::read_dir(&dir).await.map_err(|_| {
        AppError::NotFound("PDF ID not found or no images available".to_string())
    })?;

    let base = state.config.api_base();
    let mut images = Vec::new();

    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list images: {}", e)))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to inspect entry: {}", e)))?;
        if !file_type.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().to_string();
        images.push(ImageEntry {
            url: format!("{}/images/{}/{}", base, pdf_id, filename),
            id: filename,
            pdf_id: pdf_id.clone(),
        });
    }

    images.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(Json(images))
}
