//! Application state shared across handlers.

use pdfpix_core::Config;
use pdfpix_processing::{ImageExtractor, UploadValidator};

/// Everything a handler needs: configuration, the upload validator, and
/// the extraction pipeline. Wrapped in an `Arc` at router setup.
pub struct AppState {
    pub config: Config,
    pub validator: UploadValidator,
    pub extractor: ImageExtractor,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let validator = UploadValidator::new(
            config.max_upload_size_bytes,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        );
        let extractor = ImageExtractor::new(config.images_dir());

        Self {
            config,
            validator,
            extractor,
        }
    }
}
