//! OpenAPI documentation.
//!
//! Paths in handler annotations use the default /api/v1 prefix; when the
//! service is configured with a different prefix they are rewritten at
//! runtime in the served spec.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

/// Prefix used in handler path annotations (utoipa requires compile-time
/// literals).
const OPENAPI_PATH_PLACEHOLDER: &str = "/api/v1";

fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, prefix: &str) {
    if prefix == OPENAPI_PATH_PLACEHOLDER {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, prefix, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// Returns the OpenAPI spec with paths rewritten to the configured prefix.
pub fn get_openapi_spec(api_prefix: &str) -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, api_prefix);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PDF Image Extractor",
        version = "0.1.0",
        description = "API for extracting images from PDF files. Upload one or more PDFs and receive the embedded images as direct-access URLs or a combined ZIP archive."
    ),
    paths(
        handlers::extract_images::extract_images,
        handlers::image_get::get_image,
        handlers::image_list::list_pdf_images,
        handlers::health::health_check,
    ),
    components(schemas(
        handlers::extract_images::ExtractResponse,
        handlers::image_list::ImageEntry,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "pdf", description = "PDF upload and image retrieval"),
        (name = "system", description = "Health and status")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_paths_rewritten_for_custom_prefix() {
        let spec = get_openapi_spec("/api/v2");
        assert!(spec.paths.paths.keys().all(|k| k.starts_with("/api/v2")));
        assert!(spec.paths.paths.contains_key("/api/v2/extract-images"));
    }

    #[test]
    fn test_spec_paths_unchanged_for_default_prefix() {
        let spec = get_openapi_spec("/api/v1");
        assert!(spec.paths.paths.contains_key("/api/v1/extract-images"));
        assert!(spec.paths.paths.contains_key("/api/v1/health"));
    }
}
