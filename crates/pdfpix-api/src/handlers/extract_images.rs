use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use pdfpix_core::AppError;
use pdfpix_processing::archive;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

pub const IMAGE_COUNT_HEADER: &str = "X-Image-Count";
const DOWNLOAD_FILENAME: &str = "extracted_images.zip";

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    download: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExtractResponse {
    pub message: String,
    pub image_count: usize,
    pub filename: String,
    pub image_urls: Vec<String>,
}

struct UploadedFile {
    filename: String,
    content_type: String,
    data: Bytes,
}

/// Extract images from uploaded PDF files
///
/// Validates every file in the batch before any extraction starts, then
/// processes the files sequentially. One failed file fails the whole
/// request. With `download=true` the combined ZIP is returned instead of
/// the JSON summary; both variants carry an `X-Image-Count` header.
#[utoipa::path(
    post,
    path = "/api/v1/extract-images",
    tag = "pdf",
    params(
        ("download" = Option<bool>, Query, description = "Return a ZIP archive instead of JSON with image URLs")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Images extracted", body = ExtractResponse),
        (status = 400, description = "Invalid file type or content type", body = ErrorResponse),
        (status = 422, description = "No files provided", body = ErrorResponse),
        (status = 500, description = "PDF processing failure", body = ErrorResponse)
    )
)]
pub async fn extract_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let files = collect_files(multipart).await?;

    if files.is_empty() {
        return Err(AppError::Unprocessable("No files provided".to_string()).into());
    }

    // Full validation pass before any extraction starts
    for file in &files {
        state.validator.validate_extension(&file.filename)?;
        state
            .validator
            .validate_content_type(&file.filename, &file.content_type)?;
        state
            .validator
            .validate_file_size(&file.filename, file.data.len())?;
    }

    let mut total_count = 0usize;
    let mut zip_buffers = Vec::with_capacity(files.len());
    let mut image_urls = Vec::new();

    for file in &files {
        let pdf_id = Uuid::new_v4().to_string();
        tracing::debug!(filename = %file.filename, pdf_id = %pdf_id, "Extracting images");

        // lopdf parsing and image decoding are synchronous CPU work
        let extractor = state.extractor.clone();
        let data = file.data.clone();
        let id = pdf_id.clone();
        let extraction = tokio::task::spawn_blocking(move || extractor.extract(&data, &id))
            .await
            .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))??;

        total_count += extraction.image_count;
        let base = state.config.api_base();
        image_urls.extend(
            extraction
                .image_ids
                .iter()
                .map(|image_id| format!("{}/images/{}", base, image_id)),
        );
        zip_buffers.push(extraction.zip_data);
    }

    if query.download {
        let combined = archive::combine_zips(&zip_buffers)
            .map_err(|e| AppError::PdfProcessing(format!("Failed to combine archives: {}", e)))?;

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/zip")
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", DOWNLOAD_FILENAME),
            )
            .header(IMAGE_COUNT_HEADER, total_count.to_string())
            .body(Body::from(combined))
            .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

        return Ok(response);
    }

    let body = ExtractResponse {
        message: format!("Successfully extracted images from {} files", files.len()),
        image_count: total_count,
        filename: "multiple_files".to_string(),
        image_urls,
    };

    Ok(([(IMAGE_COUNT_HEADER, total_count.to_string())], Json(body)).into_response())
}

/// Drain the multipart form, keeping every part under the `files` field.
async fn collect_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>, HttpAppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart form data: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;

        files.push(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    Ok(files)
}
